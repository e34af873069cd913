//! Look-at camera

use std::f32::consts::FRAC_PI_2;

use crate::rasterizer::{Mat4, Vec3};

/// Keeps orbit pitch away from the poles, where the up vector degenerates
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Perspective camera looking from `position` at `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3, // -Y is up on screen
    /// Vertical field of view in degrees
    pub fov_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -10.0),
            target: Vec3::ZERO,
            up: Vec3::new(0.0, -1.0, 0.0),
            fov_y: 45.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target, ..Self::default() }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Combined projection * view. Clip-space w is the distance in front of the camera.
    pub fn view_projection(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective(self.fov_y, aspect, near, far) * self.view()
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).len()
    }

    /// Rotate the camera around its target, keeping the distance.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let offset = self.position - self.target;
        let radius = offset.len();
        if radius == 0.0 {
            return;
        }

        let yaw = offset.x.atan2(offset.z) + delta_yaw;
        let pitch = ((offset.y / radius).clamp(-1.0, 1.0).asin() + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.position = self.target
            + Vec3::new(
                radius * pitch.cos() * yaw.sin(),
                radius * pitch.sin(),
                radius * pitch.cos() * yaw.cos(),
            );
    }

    /// Move toward (factor < 1) or away from (factor > 1) the target
    pub fn zoom(&mut self, factor: f32) {
        let offset = self.position - self.target;
        let scaled = offset * factor;
        if scaled.len() > 0.5 {
            self.position = self.target + scaled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_viewer_setup() {
        let cam = Camera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.fov_y, 45.0);
    }

    #[test]
    fn test_view_projection_w_is_depth() {
        let vp = Camera::default().view_projection(4.0 / 3.0, 0.3, 1000.0);
        let clip = vp.transform_point(Vec3::new(0.0, 0.0, 5.0));
        assert!((clip.w - 15.0).abs() < 0.001);
        assert!(clip.x.abs() < 0.001 && clip.y.abs() < 0.001);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut cam = Camera::default();
        cam.orbit(0.7, 0.3);
        assert!((cam.distance() - 10.0).abs() < 0.001);
        assert!(cam.position.x.abs() > 1.0);

        // Pitch clamps before the pole
        cam.orbit(0.0, 10.0);
        assert!(cam.position.y < 10.0);
        assert!((cam.distance() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_orbit_full_turn_returns() {
        let mut cam = Camera::default();
        cam.orbit(std::f32::consts::TAU, 0.0);
        assert!((cam.position - Camera::default().position).len() < 0.001);
    }

    #[test]
    fn test_zoom() {
        let mut cam = Camera::default();
        cam.zoom(0.5);
        assert!((cam.distance() - 5.0).abs() < 0.001);
        cam.zoom(0.01);
        assert!((cam.distance() - 5.0).abs() < 0.001);
    }
}
