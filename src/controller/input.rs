/// Platform-agnostic input handling system
use std::collections::HashSet;

/// Logical actions the game reacts to. Raw printable characters are
/// delivered separately as [`InputEvent::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Submit,
    DeleteChar,
}

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ActionDown(Action),
    ActionUp(Action),
    Text(char),

    // Mouse events
    MouseMove { dx: f32, dy: f32 },
    MouseClick { button: MouseButton, is_down: bool },

    // Window events
    FocusLost,
    PointerLockChanged { locked: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Edge-triggered input gathered since the previous tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEdges {
    pub click: bool,
    pub submit: bool,
    pub delete: bool,
    pub typed: Vec<char>,
}

/// Input accumulated by the host between ticks and sampled once per tick
/// by the frame driver.
#[derive(Debug, Default)]
pub struct InputState {
    pub held: HashSet<Action>,
    pub look_delta: (f32, f32),
    pub pointer_locked: bool,
    edges: FrameEdges,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::ActionDown(action) => {
                // Key repeat shows up as repeated downs; only the first one is an edge
                if self.held.insert(*action) {
                    match action {
                        Action::Submit => self.edges.submit = true,
                        Action::DeleteChar => self.edges.delete = true,
                        _ => {}
                    }
                }
            }
            InputEvent::ActionUp(action) => {
                self.held.remove(action);
            }
            InputEvent::Text(c) => {
                self.edges.typed.push(*c);
            }
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::MouseClick { button, is_down } => {
                if *button == MouseButton::Left && *is_down {
                    self.edges.click = true;
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
            }
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
                if !locked {
                    self.look_delta = (0.0, 0.0);
                }
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn clear_keys(&mut self) {
        self.held.clear();
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    pub fn take_edges(&mut self) -> FrameEdges {
        std::mem::take(&mut self.edges)
    }
}

/// Characters accepted into the answer buffer: ASCII letters (lowercased),
/// digits and space.
pub fn answer_char(c: char) -> Option<char> {
    match c {
        'a'..='z' | '0'..='9' | ' ' => Some(c),
        'A'..='Z' => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

pub mod native {
    use super::*;
    use winit::event::{ElementState, KeyEvent, MouseButton as WinitButton};
    use winit::keyboard::{KeyCode, PhysicalKey};

    /// Key mapping configuration
    #[derive(Debug, Clone)]
    pub struct KeyBindings {
        pub forward: KeyCode,
        pub backward: KeyCode,
        pub left: KeyCode,
        pub right: KeyCode,
        pub submit: KeyCode,
        pub delete: KeyCode,
    }

    impl Default for KeyBindings {
        fn default() -> Self {
            Self {
                forward: KeyCode::KeyW,
                backward: KeyCode::KeyS,
                left: KeyCode::KeyA,
                right: KeyCode::KeyD,
                submit: KeyCode::Enter,
                delete: KeyCode::Backspace,
            }
        }
    }

    impl KeyBindings {
        pub fn action_for(&self, code: KeyCode) -> Option<Action> {
            match code {
                c if c == self.forward || c == KeyCode::ArrowUp => Some(Action::MoveForward),
                c if c == self.backward || c == KeyCode::ArrowDown => Some(Action::MoveBackward),
                c if c == self.left || c == KeyCode::ArrowLeft => Some(Action::StrafeLeft),
                c if c == self.right || c == KeyCode::ArrowRight => Some(Action::StrafeRight),
                c if c == self.submit || c == KeyCode::NumpadEnter => Some(Action::Submit),
                c if c == self.delete => Some(Action::DeleteChar),
                _ => None,
            }
        }
    }

    /// Translate one winit key event into zero or more input events.
    pub fn key_event_to_input(bindings: &KeyBindings, event: &KeyEvent) -> Vec<InputEvent> {
        let mut out = Vec::new();
        let PhysicalKey::Code(code) = event.physical_key else {
            return out;
        };
        let action = bindings.action_for(code);

        match event.state {
            ElementState::Pressed => {
                if let Some(action) = action {
                    out.push(InputEvent::ActionDown(action));
                }
                if !matches!(action, Some(Action::Submit | Action::DeleteChar)) && !event.repeat {
                    if let Some(text) = &event.text {
                        out.extend(text.chars().filter_map(answer_char).map(InputEvent::Text));
                    }
                }
            }
            ElementState::Released => {
                if let Some(action) = action {
                    out.push(InputEvent::ActionUp(action));
                }
            }
        }
        out
    }

    pub fn mouse_button_to_input(state: ElementState, button: WinitButton) -> Option<InputEvent> {
        let button = match button {
            WinitButton::Left => MouseButton::Left,
            WinitButton::Right => MouseButton::Right,
            WinitButton::Middle => MouseButton::Middle,
            _ => return None,
        };
        Some(InputEvent::MouseClick { button, is_down: state == ElementState::Pressed })
    }
}
