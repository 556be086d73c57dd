use glam::Vec3;

use crate::utils::Aabb;

pub const BOARD_SIZE: Vec3 = Vec3::new(2.2, 1.3, 0.12);

/// The wall-mounted puzzle board the player clicks on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Board {
    pub pos: Vec3,
    pub size: Vec3,
    pub visible: bool,
}

impl Board {
    /// Board centered on the wall at `wall_z`, at eye level, slightly
    /// proud of the wall surface.
    pub fn on_front_wall(wall_z: f32) -> Self {
        Self {
            pos: Vec3::new(0.0, 1.6, wall_z + BOARD_SIZE.z / 2.0 + 0.05),
            size: BOARD_SIZE,
            visible: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    /// Slightly larger, darker backing drawn behind the board.
    pub fn frame(&self) -> (Vec3, Vec3) {
        (self.pos - Vec3::new(0.0, 0.0, 0.04), self.size + Vec3::new(0.18, 0.18, 0.04))
    }
}
