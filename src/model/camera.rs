use glam::{Mat4, Vec3};

pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// Viewer pose. Yaw and pitch are stored in degrees; the view basis is
/// always derived from them, never integrated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::new(0.0, 1.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            up: Vec3::Y,
            fov_y: 60f32.to_radians(),
            aspect: aspect_ratio(width, height),
            z_near: 0.1,
            z_far: 100.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let cy = self.yaw.to_radians();
        let cp = self.pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG).to_radians();
        Vec3::new(cy.cos() * cp.cos(), cp.sin(), cy.sin() * cp.cos()).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Camera-space up, orthogonal to forward and right.
    pub fn view_up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    pub fn target(&self) -> Vec3 { self.eye + self.forward() }

    pub fn set_aspect(&mut self, width: u32, height: u32) { self.aspect = aspect_ratio(width, height); }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target(), self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * self.view()
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pose_looks_down_negative_z() {
        let cam = Camera::new(1000, 700);
        assert!(cam.forward().abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
        assert!(cam.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(cam.view_up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let mut cam = Camera::new(800, 600);
        cam.set_aspect(800, 0);
        assert!(cam.aspect.is_finite());
    }
}
