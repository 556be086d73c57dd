use tracing::{debug, info};

use crate::controller::interaction::InteractionProbe;
use crate::controller::look_controller::LookController;
use crate::controller::timers::TransientMessage;
use crate::model::{Board, Camera, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Walking around the room.
    Playing,
    /// Typing an answer at the board.
    Puzzle,
    /// Last level solved; only the final countdown is left.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty answer, or not in puzzle mode.
    Ignored,
    Wrong,
    LevelComplete { level_id: u32 },
    GameComplete,
}

/// Level sequence and the puzzle state machine.
pub struct PuzzleProgressionEngine {
    levels: Vec<Level>,
    current: usize,
    state: GameState,
    board: Board,
    answer: String,
    message: Option<TransientMessage>,
}

impl PuzzleProgressionEngine {
    /// # Panics
    /// If `levels` is empty.
    pub fn new(levels: Vec<Level>, board: Board) -> Self {
        assert!(!levels.is_empty(), "level sequence must not be empty");
        Self {
            levels,
            current: 0,
            state: GameState::Playing,
            board,
            answer: String::new(),
            message: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The level the player is in.
    ///
    /// # Panics
    /// If the level cursor is out of range, which the transitions never allow.
    pub fn current_level(&self) -> &Level {
        &self.levels[self.current]
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn message(&self) -> Option<&TransientMessage> {
        self.message.as_ref()
    }

    fn is_last_level(&self) -> bool {
        self.current + 1 >= self.levels.len()
    }

    /// Enter puzzle mode if the player is in look mode and aiming at the
    /// visible board. Returns whether the transition happened.
    pub fn try_open_puzzle(&mut self, camera: &Camera, probe: &InteractionProbe) -> bool {
        if self.state != GameState::Playing || !self.board.visible {
            return false;
        }
        if !probe.hits(camera, &self.board.aabb()) {
            debug!("click missed the board");
            return false;
        }
        self.answer.clear();
        self.state = GameState::Puzzle;
        info!(level = self.current_level().id, "puzzle opened");
        true
    }

    pub fn push_char(&mut self, c: char) -> bool {
        if self.state != GameState::Puzzle {
            return false;
        }
        self.answer.push(c);
        true
    }

    pub fn pop_char(&mut self) -> bool {
        if self.state != GameState::Puzzle {
            return false;
        }
        self.answer.pop().is_some()
    }

    /// Check the typed answer against the current level.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.state != GameState::Puzzle {
            return SubmitOutcome::Ignored;
        }
        if self.answer.trim().is_empty() {
            debug!("ignoring empty answer");
            return SubmitOutcome::Ignored;
        }

        if !self.current_level().accepts(&self.answer) {
            info!(level = self.current_level().id, "wrong answer");
            self.answer.clear();
            self.message = Some(TransientMessage::failure("✗ Wrong Answer - Try Again"));
            self.state = GameState::Playing;
            return SubmitOutcome::Wrong;
        }

        let level_id = self.current_level().id;
        self.levels[self.current].mark_completed();
        self.board.visible = false;
        self.answer.clear();

        if self.is_last_level() {
            info!(level = level_id, "last level complete, game finished");
            self.state = GameState::Finished;
            SubmitOutcome::GameComplete
        } else {
            info!(level = level_id, "level complete");
            self.message = Some(TransientMessage::success(format!("✓ Level {level_id} Complete!")));
            self.state = GameState::Playing;
            SubmitOutcome::LevelComplete { level_id }
        }
    }

    /// Count the banner down. When it runs out after a completed level
    /// (board hidden, game not finished) the next level is loaded. Returns
    /// true if a level was loaded.
    pub fn tick_message(&mut self, dt: f32, controller: &mut LookController) -> bool {
        let Some(message) = self.message.as_mut() else {
            return false;
        };
        if !message.tick(dt) {
            return false;
        }
        self.message = None;

        if !self.board.visible && self.state != GameState::Finished {
            self.advance_level(controller);
            return true;
        }
        false
    }

    fn advance_level(&mut self, controller: &mut LookController) {
        if self.is_last_level() {
            self.state = GameState::Finished;
            return;
        }
        self.current += 1;
        self.board.visible = true;
        self.answer.clear();
        self.message = None;
        controller.reset_to_spawn();
        info!(level = self.current_level().id, "entered level");
    }
}
