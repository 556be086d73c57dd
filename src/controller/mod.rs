// CONTROLLER: Input, game logic, and update loop
pub mod input;
pub mod look_controller;
pub mod interaction;
pub mod puzzle;
pub mod timers;
pub mod frame_driver;

pub use input::{Action, InputEvent, InputState};
pub use look_controller::{LookController, Spawn};
pub use interaction::InteractionProbe;
pub use puzzle::{GameState, PuzzleProgressionEngine, SubmitOutcome};
pub use timers::{Severity, TransientMessage, UiTimerState};
pub use frame_driver::{FocusMode, FrameDriver, FrameSnapshot, MessageView, PuzzleView};
