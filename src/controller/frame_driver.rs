use glam::{Mat4, Vec3};
use tracing::info;

use crate::config::GameConfig;
use crate::controller::input::{answer_char, InputState};
use crate::controller::interaction::InteractionProbe;
use crate::controller::look_controller::{LookController, Spawn};
use crate::controller::puzzle::{GameState, PuzzleProgressionEngine, SubmitOutcome};
use crate::controller::timers::{Severity, UiTimerState, FINAL_SEQUENCE_SECS};
use crate::model::{default_levels, Board, Camera, RoomBounds};
use crate::model::room::ROOM_HALF_SIZE;

pub const ROOM_LIMIT: f32 = 4.5;
pub const PLAYER_RADIUS: f32 = 0.3;
pub const PLAYER_HEIGHT: f32 = 1.0;
pub const SPAWN: Spawn = Spawn { pos: Vec3::new(0.0, PLAYER_HEIGHT, 3.0), yaw: -90.0, pitch: 0.0 };

/// Longest step the player may move in a single tick. Hitches longer than
/// this are walked off in slow motion instead of teleporting. Timers always
/// see the real elapsed time.
const MAX_MOVE_DT: f32 = 0.1;

/// How the host should treat the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    /// Pointer captured, mouse turns the camera.
    Look,
    /// Pointer free, keys go to the answer box.
    TextEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleView {
    pub level_id: u32,
    pub question: String,
    pub answer: String,
    pub caret_visible: bool,
}

/// Everything the renderer and the UI need for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub camera: Camera,
    pub view_proj: Mat4,
    pub theme_color: Vec3,
    pub board: Board,
    pub mode: GameState,
    pub message: Option<MessageView>,
    pub puzzle: Option<PuzzleView>,
    pub show_final_image: bool,
}

/// Owns the whole game and advances it one tick at a time.
pub struct FrameDriver {
    controller: LookController,
    probe: InteractionProbe,
    engine: PuzzleProgressionEngine,
    timers: UiTimerState,
}

impl FrameDriver {
    pub fn new(config: &GameConfig, width: u32, height: u32) -> Self {
        let mut camera = Camera::new(width, height);
        camera.fov_y = config.fov_deg.to_radians();

        let mut controller = LookController::new(
            camera,
            RoomBounds::square(ROOM_LIMIT, PLAYER_RADIUS, PLAYER_HEIGHT),
            SPAWN,
        );
        controller.move_speed = config.move_speed;
        controller.mouse_sensitivity = config.mouse_sensitivity;

        let engine = PuzzleProgressionEngine::new(default_levels(), Board::on_front_wall(-ROOM_HALF_SIZE));

        Self::from_parts(controller, InteractionProbe::new(config.interaction_distance), engine)
    }

    pub fn from_parts(
        controller: LookController,
        probe: InteractionProbe,
        engine: PuzzleProgressionEngine,
    ) -> Self {
        Self { controller, probe, engine, timers: UiTimerState::new() }
    }

    pub fn controller(&self) -> &LookController {
        &self.controller
    }

    pub fn engine(&self) -> &PuzzleProgressionEngine {
        &self.engine
    }

    pub fn timers(&self) -> &UiTimerState {
        &self.timers
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.controller.camera_mut().set_aspect(width, height);
    }

    pub fn focus_mode(&self) -> FocusMode {
        match self.engine.state() {
            GameState::Puzzle => FocusMode::TextEntry,
            GameState::Playing | GameState::Finished => FocusMode::Look,
        }
    }

    /// Whether the quit key may close the game right now. It is left alone
    /// while an answer is being typed.
    pub fn quit_key_allowed(&self) -> bool {
        self.focus_mode() == FocusMode::Look
    }

    /// Set once the final countdown has elapsed; the host should quit.
    pub fn should_exit(&self) -> bool {
        self.timers.exit_requested()
    }

    /// Advance the game by `dt` seconds using the input gathered since the
    /// previous tick.
    pub fn tick(&mut self, input: &mut InputState, dt: f32) -> FrameSnapshot {
        let dt = dt.max(0.0);
        let move_dt = dt.min(MAX_MOVE_DT);

        // Timers first: a level loaded by an expiring banner is visible to
        // the rest of this tick
        self.engine.tick_message(dt, &mut self.controller);
        self.timers.tick(dt);

        let (dx, dy) = input.consume_look();
        let edges = input.take_edges();
        let playing = self.engine.state() == GameState::Playing;

        if playing && (dx != 0.0 || dy != 0.0) {
            self.controller.apply_mouse_delta(dx, dy);
        }
        // Always runs so the room clamp holds even without movement
        self.controller.apply_movement(|a| playing && input.is_held(a), move_dt);

        if self.engine.state() == GameState::Puzzle {
            for c in edges.typed.into_iter().filter_map(answer_char) {
                self.engine.push_char(c);
            }
            if edges.delete {
                self.engine.pop_char();
            }
            if edges.submit {
                self.handle_submit();
            }
        } else if edges.click && playing
            && self.engine.try_open_puzzle(self.controller.camera(), &self.probe)
        {
            self.controller.release_mouse();
        }

        self.snapshot()
    }

    fn handle_submit(&mut self) {
        match self.engine.submit() {
            SubmitOutcome::GameComplete => {
                info!("all levels solved");
                self.timers.arm_final(FINAL_SEQUENCE_SECS);
            }
            SubmitOutcome::Ignored | SubmitOutcome::Wrong | SubmitOutcome::LevelComplete { .. } => {}
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let camera = *self.controller.camera();
        let level = self.engine.current_level();
        let state = self.engine.state();

        FrameSnapshot {
            camera,
            view_proj: camera.view_proj(),
            theme_color: level.theme_color,
            board: *self.engine.board(),
            mode: state,
            message: self.engine.message().map(|m| MessageView {
                text: m.text.clone(),
                severity: m.severity,
            }),
            puzzle: (state == GameState::Puzzle).then(|| PuzzleView {
                level_id: level.id,
                question: level.question.clone(),
                answer: self.engine.answer().to_string(),
                caret_visible: self.timers.caret_visible(),
            }),
            show_final_image: self.timers.final_sequence().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::{Action, InputEvent, MouseButton};

    const DT: f32 = 1.0 / 60.0;

    fn driver() -> FrameDriver {
        FrameDriver::new(&GameConfig::default(), 1000, 700)
    }

    fn click() -> InputEvent {
        InputEvent::MouseClick { button: MouseButton::Left, is_down: true }
    }

    /// Walk straight ahead from spawn until the board is within reach.
    fn walk_to_board(d: &mut FrameDriver, input: &mut InputState) {
        input.process_event(&InputEvent::ActionDown(Action::MoveForward));
        for _ in 0..200 {
            d.tick(input, DT);
        }
        input.process_event(&InputEvent::ActionUp(Action::MoveForward));
        assert!(d.controller().camera().eye.z < -4.0, "should be at the front wall");
    }

    fn open_board(d: &mut FrameDriver, input: &mut InputState) {
        walk_to_board(d, input);
        input.process_event(&click());
        let snap = d.tick(input, DT);
        assert_eq!(snap.mode, GameState::Puzzle);
        assert_eq!(d.focus_mode(), FocusMode::TextEntry);
    }

    fn answer(d: &mut FrameDriver, input: &mut InputState, text: &str) -> FrameSnapshot {
        for c in text.chars() {
            input.process_event(&InputEvent::Text(c));
        }
        d.tick(input, DT);
        input.process_event(&InputEvent::ActionDown(Action::Submit));
        let snap = d.tick(input, DT);
        input.process_event(&InputEvent::ActionUp(Action::Submit));
        snap
    }

    fn run_for(d: &mut FrameDriver, input: &mut InputState, secs: f32) -> FrameSnapshot {
        let mut snap = d.snapshot();
        let mut t = 0.0;
        while t < secs {
            snap = d.tick(input, DT);
            t += DT;
        }
        snap
    }

    #[test]
    fn click_from_spawn_is_out_of_reach() {
        let mut d = driver();
        let mut input = InputState::new();
        input.process_event(&click());
        let snap = d.tick(&mut input, DT);
        assert_eq!(snap.mode, GameState::Playing);
        assert!(snap.puzzle.is_none());
    }

    #[test]
    fn typed_text_while_walking_is_ignored() {
        let mut d = driver();
        let mut input = InputState::new();
        input.process_event(&InputEvent::Text('x'));
        d.tick(&mut input, DT);
        assert_eq!(d.engine().answer(), "");
    }

    #[test]
    fn puzzle_snapshot_carries_question_and_answer() {
        let mut d = driver();
        let mut input = InputState::new();
        open_board(&mut d, &mut input);
        input.process_event(&InputEvent::Text('1'));
        let snap = d.tick(&mut input, DT);
        let puzzle = snap.puzzle.expect("puzzle view");
        assert_eq!(puzzle.level_id, 1);
        assert_eq!(puzzle.question, "What is 5 + 7?");
        assert_eq!(puzzle.answer, "1");
        assert_eq!(snap.theme_color, Vec3::new(0.8, 0.8, 0.9));
    }

    #[test]
    fn movement_is_frozen_while_typing() {
        let mut d = driver();
        let mut input = InputState::new();
        open_board(&mut d, &mut input);
        let before = d.controller().camera().eye;
        input.process_event(&InputEvent::ActionDown(Action::MoveBackward));
        run_for(&mut d, &mut input, 0.5);
        assert_eq!(d.controller().camera().eye, before);
    }

    #[test]
    fn correct_answer_then_banner_then_next_level() {
        let mut d = driver();
        let mut input = InputState::new();
        open_board(&mut d, &mut input);

        let snap = answer(&mut d, &mut input, "12");
        assert!(d.engine().levels()[0].completed);
        assert!(!snap.board.visible);
        assert_eq!(snap.mode, GameState::Playing);
        let msg = snap.message.expect("success banner");
        assert_eq!(msg.severity, Severity::Success);
        assert_eq!(d.engine().current_index(), 0);

        let snap = run_for(&mut d, &mut input, 2.6);
        assert_eq!(d.engine().current_index(), 1);
        assert!(snap.board.visible);
        assert!(snap.message.is_none());
        assert_eq!(d.engine().answer(), "");
        assert_eq!(snap.camera.eye, SPAWN.pos);
        assert_eq!(snap.camera.yaw, SPAWN.yaw);
        assert_eq!(snap.theme_color, Vec3::new(0.9, 0.8, 0.8));
    }

    #[test]
    fn wrong_answer_returns_to_look_mode_at_once() {
        let mut d = driver();
        let mut input = InputState::new();
        open_board(&mut d, &mut input);

        let snap = answer(&mut d, &mut input, "11");
        assert_eq!(snap.mode, GameState::Playing);
        assert_eq!(d.focus_mode(), FocusMode::Look);
        assert_eq!(d.engine().answer(), "");
        let msg = snap.message.expect("failure banner");
        assert_eq!(msg.severity, Severity::Failure);
        assert!(snap.board.visible);

        let snap = run_for(&mut d, &mut input, 2.1);
        assert!(snap.message.is_none());
        assert_eq!(d.engine().current_index(), 0);
    }

    #[test]
    fn finishing_shows_final_image_then_exits() {
        let mut d = driver();
        let mut input = InputState::new();
        for a in ["12", "spongebob squarepants"] {
            open_board(&mut d, &mut input);
            answer(&mut d, &mut input, a);
            run_for(&mut d, &mut input, 2.6);
        }
        open_board(&mut d, &mut input);
        let snap = answer(&mut d, &mut input, "Hataba");
        assert_eq!(snap.mode, GameState::Finished);
        assert!(snap.show_final_image);
        assert!(!d.should_exit());

        run_for(&mut d, &mut input, 4.5);
        assert!(!d.should_exit());
        run_for(&mut d, &mut input, 0.6);
        assert!(d.should_exit());
        run_for(&mut d, &mut input, 1.0);
        assert!(d.should_exit(), "exit request must stick");
    }

    #[test]
    fn huge_frame_time_is_capped() {
        let mut d = driver();
        let mut input = InputState::new();
        input.process_event(&InputEvent::ActionDown(Action::MoveForward));
        d.tick(&mut input, 5.0);
        let z = d.controller().camera().eye.z;
        assert!((z - (SPAWN.pos.z - 3.0 * MAX_MOVE_DT)).abs() < 1e-4, "z = {z}");
    }

    #[test]
    fn long_stall_still_runs_the_final_countdown_in_real_time() {
        let mut d = driver();
        let mut input = InputState::new();
        d.timers.arm_final(FINAL_SEQUENCE_SECS);
        d.tick(&mut input, 5.5);
        assert!(d.should_exit());
    }

    #[test]
    fn long_stall_still_expires_the_success_banner() {
        let mut d = driver();
        let mut input = InputState::new();
        open_board(&mut d, &mut input);
        answer(&mut d, &mut input, "12");
        let snap = d.tick(&mut input, 3.0);
        assert_eq!(d.engine().current_index(), 1);
        assert!(snap.message.is_none());
        assert!(snap.board.visible);
    }

    #[test]
    fn control_characters_never_reach_the_answer() {
        let mut d = driver();
        let mut input = InputState::new();
        open_board(&mut d, &mut input);
        for c in ['\u{7}', '\n', 'A', '\t', '7', '\u{1b}'] {
            input.process_event(&InputEvent::Text(c));
        }
        d.tick(&mut input, DT);
        assert_eq!(d.engine().answer(), "a7");
    }

    #[test]
    fn quit_key_is_ignored_while_typing() {
        let mut d = driver();
        let mut input = InputState::new();
        assert!(d.quit_key_allowed());
        open_board(&mut d, &mut input);
        assert!(!d.quit_key_allowed());
        answer(&mut d, &mut input, "wrong");
        assert!(d.quit_key_allowed());
    }
}
