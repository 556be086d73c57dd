use glam::{Vec2, Vec3};

/// Walkable area of the room. Only X and Z are bounded, the eye height is
/// pinned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    pub min: Vec2,
    pub max: Vec2,
    pub radius: f32,
    pub eye_height: f32,
}

impl RoomBounds {
    /// Square room of half-extent `limit` around the origin.
    pub fn square(limit: f32, radius: f32, eye_height: f32) -> Self {
        Self {
            min: Vec2::splat(-limit),
            max: Vec2::splat(limit),
            radius,
            eye_height,
        }
    }

    pub fn clamp(&self, pos: Vec3) -> Vec3 {
        let lo = self.min + Vec2::splat(self.radius);
        let hi = self.max - Vec2::splat(self.radius);
        Vec3::new(
            pos.x.clamp(lo.x, hi.x),
            self.eye_height,
            pos.z.clamp(lo.y, hi.y),
        )
    }

    pub fn contains(&self, pos: Vec3) -> bool {
        self.clamp(pos) == pos
    }
}

/// Half-extent of the rendered room shell.
pub const ROOM_HALF_SIZE: f32 = 5.0;

/// A static piece of room geometry: center, size, and whether it takes the
/// level's theme tint.
#[derive(Debug, Clone, Copy)]
pub struct RoomPiece {
    pub center: Vec3,
    pub size: Vec3,
    pub themed: bool,
}

pub fn room_pieces() -> [RoomPiece; 5] {
    let s = ROOM_HALF_SIZE * 2.0;
    [
        // Floor
        RoomPiece { center: Vec3::new(0.0, -1.0, 0.0), size: Vec3::new(s, 0.2, s), themed: false },
        // Back, front, left, right walls
        RoomPiece { center: Vec3::new(0.0, 1.0, -ROOM_HALF_SIZE), size: Vec3::new(s, 4.0, 0.2), themed: true },
        RoomPiece { center: Vec3::new(0.0, 1.0, ROOM_HALF_SIZE), size: Vec3::new(s, 4.0, 0.2), themed: true },
        RoomPiece { center: Vec3::new(-ROOM_HALF_SIZE, 1.0, 0.0), size: Vec3::new(0.2, 4.0, s), themed: true },
        RoomPiece { center: Vec3::new(ROOM_HALF_SIZE, 1.0, 0.0), size: Vec3::new(0.2, 4.0, s), themed: true },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_radius_and_eye_height() {
        let bounds = RoomBounds::square(4.5, 0.3, 1.0);
        let p = bounds.clamp(Vec3::new(10.0, 7.0, -10.0));
        assert!(p.abs_diff_eq(Vec3::new(4.2, 1.0, -4.2), 1e-6), "clamped to {p}");
        assert_eq!(p.y, 1.0);
        assert!(bounds.contains(p));
    }

    #[test]
    fn inside_point_only_gets_height_pinned() {
        let bounds = RoomBounds::square(4.5, 0.3, 1.0);
        assert_eq!(bounds.clamp(Vec3::new(1.0, 0.0, 2.0)), Vec3::new(1.0, 1.0, 2.0));
    }
}
