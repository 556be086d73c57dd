use tracing::trace;

use crate::model::Camera;
use crate::utils::{Aabb, ray_aabb};

/// Decides whether the player is looking at an object close enough to
/// interact with it.
#[derive(Debug, Clone, Copy)]
pub struct InteractionProbe {
    pub max_distance: f32,
}

impl InteractionProbe {
    pub fn new(max_distance: f32) -> Self {
        Self { max_distance }
    }

    pub fn hits(&self, camera: &Camera, target: &Aabb) -> bool {
        probe(camera, target, self.max_distance)
    }
}

/// Cast the eye ray against `target`. A hit counts only if the box surface
/// is at most `max_distance` away along the ray.
pub fn probe(camera: &Camera, target: &Aabb, max_distance: f32) -> bool {
    let hit = ray_aabb(camera.eye, camera.forward(), target);
    trace!(?hit, max_distance, "interaction probe");
    matches!(hit, Some(t) if t <= max_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn board() -> Aabb {
        Aabb::from_center_size(Vec3::new(0.0, 1.6, -4.93), Vec3::new(2.2, 1.3, 0.12))
    }

    fn camera_at(eye: Vec3, look_at: Vec3) -> Camera {
        let mut cam = Camera::new(1000, 700);
        let dir = (look_at - eye).normalize();
        cam.eye = eye;
        cam.yaw = dir.z.atan2(dir.x).to_degrees();
        cam.pitch = dir.y.asin().to_degrees();
        cam
    }

    #[test]
    fn looking_straight_at_board_hits() {
        let b = board();
        let cam = camera_at(Vec3::new(0.0, 1.0, 3.0), b.center());
        assert!(probe(&cam, &b, f32::INFINITY));
    }

    #[test]
    fn looking_away_misses() {
        let b = board();
        let eye = Vec3::new(0.0, 1.0, 3.0);
        let cam = camera_at(eye, eye + (eye - b.center()));
        assert!(!probe(&cam, &b, f32::INFINITY));
    }

    #[test]
    fn distance_gate_rejects_far_hits() {
        let b = board();
        let cam = camera_at(Vec3::new(0.0, 1.0, 3.0), b.center());
        assert!(!probe(&cam, &b, 3.0));

        let near = camera_at(Vec3::new(0.0, 1.0, -3.0), b.center());
        assert!(probe(&near, &b, 3.0));
        assert!(InteractionProbe::new(3.0).hits(&near, &b));
    }

    #[test]
    fn level_gaze_at_eye_height_catches_lower_edge() {
        // Board spans y in [0.95, 2.25]
        let mut cam = Camera::new(1000, 700);
        cam.eye = Vec3::new(0.0, 1.0, -4.0);
        assert!(probe(&cam, &board(), 3.0));
    }

    #[test]
    fn probe_is_pure() {
        let b = board();
        let cam = camera_at(Vec3::new(0.3, 1.0, -2.0), b.center());
        let first = probe(&cam, &b, 3.0);
        for _ in 0..10 {
            assert_eq!(probe(&cam, &b, 3.0), first);
        }
    }
}
