use glam::Vec3;

use crate::controller::input::Action;
use crate::model::camera::PITCH_LIMIT_DEG;
use crate::model::{Camera, RoomBounds};

/// Where the player stands (and which way they face) at the start of every
/// level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub pos: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Owns the player camera: mouse-look, planar WASD movement and keeping the
/// player inside the room.
pub struct LookController {
    camera: Camera,
    bounds: RoomBounds,
    spawn: Spawn,
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    first_mouse: bool,
}

impl LookController {
    pub fn new(camera: Camera, bounds: RoomBounds, spawn: Spawn) -> Self {
        let mut controller = Self {
            camera,
            bounds,
            spawn,
            move_speed: 3.0,
            mouse_sensitivity: 0.1,
            first_mouse: true,
        };
        controller.reset_to_spawn();
        controller
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn bounds(&self) -> &RoomBounds {
        &self.bounds
    }

    /// Rotate the view by a mouse delta in pixels. The first sample after
    /// (re)capturing the pointer only latches and does not rotate.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        if self.first_mouse {
            self.first_mouse = false;
            return;
        }
        self.camera.yaw += dx * self.mouse_sensitivity;
        // Screen Y grows downwards
        self.camera.pitch = (self.camera.pitch - dy * self.mouse_sensitivity)
            .clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// Re-arm the first-sample latch, e.g. after the pointer was released
    /// for text entry.
    pub fn release_mouse(&mut self) {
        self.first_mouse = true;
    }

    /// Walk along the floor plane and clamp into the room. The clamp runs
    /// every call, pressed keys or not, so teleports are constrained too.
    pub fn apply_movement(&mut self, held: impl Fn(Action) -> bool, dt: f32) {
        let forward = self.camera.forward();
        let flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        let right = flat.cross(self.camera.up).normalize_or_zero();
        let step = self.move_speed * dt;

        let mut pos = self.camera.eye;
        if held(Action::MoveForward) {
            pos += flat * step;
        }
        if held(Action::MoveBackward) {
            pos -= flat * step;
        }
        if held(Action::StrafeLeft) {
            pos -= right * step;
        }
        if held(Action::StrafeRight) {
            pos += right * step;
        }

        self.camera.eye = self.bounds.clamp(pos);
    }

    pub fn reset_to_spawn(&mut self) {
        self.camera.eye = self.bounds.clamp(self.spawn.pos);
        self.camera.yaw = self.spawn.yaw;
        self.camera.pitch = self.spawn.pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }
}
