//! Window, input and presentation settings. Loaded from `config.ron` at
//! startup. Level content is fixed and not part of the config.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "ESCAPE_ROOM_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels (ignored in fullscreen).
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels (ignored in fullscreen).
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Borderless fullscreen on the primary monitor.
    #[serde(default = "default_true")]
    pub fullscreen: bool,
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Degrees of rotation per pixel of mouse movement.
    #[serde(default = "default_sensitivity")]
    pub mouse_sensitivity: f32,
    /// Walking speed in units per second.
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov_deg: f32,
    /// How close the board has to be to click it.
    #[serde(default = "default_interaction_distance")]
    pub interaction_distance: f32,
    /// Image revealed after the last level.
    #[serde(default = "default_final_image")]
    pub final_image: PathBuf,
    #[serde(default = "default_floor_texture")]
    pub floor_texture: PathBuf,
    /// Tiled over all four walls and tinted with the level color.
    #[serde(default = "default_wall_texture")]
    pub wall_texture: PathBuf,
}

fn default_window_width() -> u32 {
    1000
}
fn default_window_height() -> u32 {
    700
}
fn default_true() -> bool {
    true
}
fn default_sensitivity() -> f32 {
    0.1
}
fn default_move_speed() -> f32 {
    3.0
}
fn default_fov() -> f32 {
    60.0
}
fn default_interaction_distance() -> f32 {
    3.0
}
fn default_final_image() -> PathBuf {
    PathBuf::from("assets/textures/final_image.jpg")
}
fn default_floor_texture() -> PathBuf {
    PathBuf::from("assets/textures/floor.jpg")
}
fn default_wall_texture() -> PathBuf {
    PathBuf::from("assets/textures/wall.jpg")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            fullscreen: default_true(),
            vsync: default_true(),
            mouse_sensitivity: default_sensitivity(),
            move_speed: default_move_speed(),
            fov_deg: default_fov(),
            interaction_distance: default_interaction_distance(),
            final_image: default_final_image(),
            floor_texture: default_floor_texture(),
            wall_texture: default_wall_texture(),
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, AppError> {
        Ok(ron::from_str(s)?)
    }

    /// Load config from `$ESCAPE_ROOM_CONFIG` or `./config.ron`. A missing
    /// file gives the defaults; an invalid one is logged and also gives the
    /// defaults.
    pub fn load() -> Self {
        let path = config_path();
        let Ok(data) = std::fs::read_to_string(&path) else {
            info!(?path, "no config file, using defaults");
            return Self::default();
        };
        match Self::from_ron_str(&data) {
            Ok(c) => {
                info!(?path, "loaded config");
                c
            }
            Err(e) => {
                warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_struct_gives_defaults() {
        assert_eq!(GameConfig::from_ron_str("()").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_config_overrides_only_given_fields() {
        let c = GameConfig::from_ron_str("(fullscreen: false, mouse_sensitivity: 0.25)").unwrap();
        assert!(!c.fullscreen);
        assert_eq!(c.mouse_sensitivity, 0.25);
        assert_eq!(c.move_speed, 3.0);
        assert_eq!(c.interaction_distance, 3.0);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(matches!(GameConfig::from_ron_str("(fullscreen: maybe)"), Err(AppError::Config(_))));
    }

    #[test]
    fn shipped_example_matches_defaults() {
        let c = GameConfig::from_ron_str(include_str!("../config.example.ron")).unwrap();
        assert_eq!(c, GameConfig::default());
    }
}
