use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};
use tracing_subscriber::util::SubscriberInitExt;

/// Log file used when `RUST_LOG_FILE` is not set.
pub const DEFAULT_LOG_FILE: &str = "logs/escape-room.log";

/// Directory and file-name prefix for the rolling appender.
fn split_log_path(log_path: &str) -> (PathBuf, OsString) {
    let path = Path::new(log_path);
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let default_name = Path::new(DEFAULT_LOG_FILE).file_name().unwrap_or_default();
    let file_name = path.file_name().unwrap_or(default_name);
    (dir.to_path_buf(), file_name.to_os_string())
}

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Install the global subscriber: stderr plus a daily-rolling file, both
/// filtered by `RUST_LOG` (default `info`). Also routes panics through
/// `tracing` with a backtrace.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .compact();

    let log_path = env::var("RUST_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let (dir, file_name) = split_log_path(&log_path);
    let (nb_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));
    let _ = FILE_GUARD.set(guard);

    let file_layer = fmt::layer()
        .with_writer(nb_writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    std::panic::set_hook(Box::new(|info| {
        let mut msg = String::new();
        if let Some(loc) = info.location() {
            msg.push_str(&format!("panic at {}:{}:{} ", loc.file(), loc.line(), loc.column()));
        }
        if let Some(s) = info.payload().downcast_ref::<&str>() { msg.push_str(s); }
        else if let Some(s) = info.payload().downcast_ref::<String>() { msg.push_str(s); }
        else { msg.push_str("<non-string panic>"); }
        let bt = std::backtrace::Backtrace::force_capture();
        tracing::error!("{}\nBacktrace:\n{:?}", msg, bt);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_goes_to_logs_dir() {
        let (dir, name) = split_log_path(DEFAULT_LOG_FILE);
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(name, OsString::from("escape-room.log"));
    }

    #[test]
    fn bare_file_name_logs_next_to_cwd() {
        let (dir, name) = split_log_path("game.log");
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, OsString::from("game.log"));
    }

    #[test]
    fn directory_only_path_falls_back_to_default_name() {
        let (dir, name) = split_log_path("/");
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, OsString::from("escape-room.log"));
    }
}
