use tracing::info;

pub const CARET_BLINK_PERIOD: f32 = 0.5;
pub const SUCCESS_MESSAGE_SECS: f32 = 2.5;
pub const FAILURE_MESSAGE_SECS: f32 = 2.0;
pub const FINAL_SEQUENCE_SECS: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Failure,
    Info,
}

/// A banner shown for a fixed time.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientMessage {
    pub text: String,
    pub severity: Severity,
    pub remaining: f32,
}

impl TransientMessage {
    pub fn new(text: impl Into<String>, severity: Severity, duration: f32) -> Self {
        Self { text: text.into(), severity, remaining: duration }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Success, SUCCESS_MESSAGE_SECS)
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Failure, FAILURE_MESSAGE_SECS)
    }

    /// Count down. Returns true once the message has run out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// Countdown from the reveal image to the exit request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalSequence {
    pub remaining: f32,
}

/// Clock-driven UI state that runs independently of the puzzle: the caret
/// blink and the final countdown.
#[derive(Debug)]
pub struct UiTimerState {
    caret_visible: bool,
    caret_timer: f32,
    final_sequence: Option<FinalSequence>,
    exit_requested: bool,
}

impl Default for UiTimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiTimerState {
    pub fn new() -> Self {
        Self {
            caret_visible: true,
            caret_timer: 0.0,
            final_sequence: None,
            exit_requested: false,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.caret_timer += dt;
        if self.caret_timer >= CARET_BLINK_PERIOD {
            self.caret_visible = !self.caret_visible;
            self.caret_timer = 0.0;
        }

        if let Some(seq) = self.final_sequence.as_mut() {
            seq.remaining -= dt;
            if seq.remaining <= 0.0 && !self.exit_requested {
                self.exit_requested = true;
                info!("final sequence elapsed, requesting exit");
            }
        }
    }

    /// Start the final countdown. Arming again has no effect.
    pub fn arm_final(&mut self, duration: f32) {
        if self.final_sequence.is_none() {
            info!(duration, "final sequence armed");
            self.final_sequence = Some(FinalSequence { remaining: duration });
        }
    }

    pub fn caret_visible(&self) -> bool {
        self.caret_visible
    }

    pub fn final_sequence(&self) -> Option<&FinalSequence> {
        self.final_sequence.as_ref()
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_toggles_every_half_second() {
        let mut t = UiTimerState::new();
        assert!(t.caret_visible());
        t.tick(0.3);
        assert!(t.caret_visible());
        t.tick(0.25);
        assert!(!t.caret_visible());
        t.tick(0.5);
        assert!(t.caret_visible());
    }

    #[test]
    fn message_expires_after_duration() {
        let mut m = TransientMessage::failure("nope");
        assert_eq!(m.remaining, 2.0);
        assert!(!m.tick(1.0));
        assert!(!m.tick(0.5));
        assert!(m.tick(0.5));
    }

    #[test]
    fn exit_is_requested_once_countdown_elapses_and_stays() {
        let mut t = UiTimerState::new();
        t.tick(100.0);
        assert!(!t.exit_requested(), "nothing armed yet");

        t.arm_final(FINAL_SEQUENCE_SECS);
        t.tick(4.0);
        assert!(!t.exit_requested());
        t.tick(1.0);
        assert!(t.exit_requested());
        for _ in 0..5 {
            t.tick(0.1);
            assert!(t.exit_requested());
        }
    }

    #[test]
    fn rearming_does_not_restart_countdown() {
        let mut t = UiTimerState::new();
        t.arm_final(5.0);
        t.tick(3.0);
        t.arm_final(5.0);
        assert_eq!(t.final_sequence().map(|s| s.remaining), Some(2.0));
    }
}
