//! Perspective camera for the backdrop.
//!
//! The camera looks down -Z from `(0, y, CAMERA_Z)`. Scroll moves it down and
//! rolls it slightly; everything else in the scene moves around it.

use glam::{Mat4, Quat, Vec3};

use crate::constants::{
    CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_Z, SCROLL_CAMERA_DROP, SCROLL_CAMERA_ROLL,
};

#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub roll: f32,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, CAMERA_Z),
            roll: 0.0,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Aspect is width over height; zero-sized boxes keep the previous value.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Parallax-on-scroll: drop and roll proportional to the offset.
    pub fn follow_scroll(&mut self, scroll_px: f32) {
        self.position.y = -scroll_px * SCROLL_CAMERA_DROP;
        self.roll = scroll_px * SCROLL_CAMERA_ROLL;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        let world = Mat4::from_rotation_translation(Quat::from_rotation_z(self.roll), self.position);
        world.inverse()
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn scroll_drops_and_rolls() {
        let mut cam = Camera::default();
        cam.follow_scroll(500.0);
        assert!((cam.position.y + 10.0).abs() < 1e-5);
        assert!((cam.roll - 0.05).abs() < 1e-6);
        cam.follow_scroll(0.0);
        assert_eq!(cam.position.y, 0.0);
        assert_eq!(cam.roll, 0.0);
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let cam = Camera::default();
        let clip = cam.view_proj() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn viewport_ignores_empty_boxes() {
        let mut cam = Camera::default();
        cam.set_viewport(768, 1024);
        assert!((cam.aspect - 0.75).abs() < 1e-6);
        cam.set_viewport(0, 300);
        assert!((cam.aspect - 0.75).abs() < 1e-6);
    }
}
