use glam::{Mat4, Vec2};

use crate::units::PIXELS_PER_METER;

/// How strongly the camera is pulled toward its target each frame.
const TARGET_ATTRACTION: f32 = 0.06;
/// The camera never drops below this height, so the ground stays in frame.
const MIN_CENTER_HEIGHT: f32 = 2.0;

/// A 2D orthographic camera that trails the fox. World units are meters;
/// one meter maps to `PIXELS_PER_METER` pixels at zoom 1.0.
pub struct Camera {
    pub center: Vec2,
    home: Vec2,
    width: f32,
    height: f32,
    zoom: f32,
}

impl Camera {
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            home: center,
            width,
            height,
            zoom: 1.0,
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// Ease toward the target point, never sinking below the minimum height.
    pub fn target_approach(&mut self, target: Vec2) {
        let clamped = Vec2::new(target.x, target.y.max(MIN_CENTER_HEIGHT));
        self.center += (clamped - self.center) * TARGET_ATTRACTION;
    }

    pub fn reset(&mut self) {
        self.center = self.home;
    }

    /// How far the view has moved from its starting point, in meters.
    /// Parallax layers shift by a fraction of this.
    pub fn travel(&self) -> Vec2 {
        self.center - self.home
    }

    /// Half the visible world extent, in meters.
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(
            self.width / (2.0 * PIXELS_PER_METER * self.zoom),
            self.height / (2.0 * PIXELS_PER_METER * self.zoom),
        )
    }

    pub fn mvp_matrix(&self) -> Mat4 {
        let half = self.half_extent();
        Mat4::orthographic_rh(
            self.center.x - half.x,
            self.center.x + half.x,
            self.center.y - half.y,
            self.center.y + half.y,
            -1.0,
            1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_moves_toward_the_target() {
        let mut camera = Camera::new(Vec2::new(0.0, 3.0), 1200.0, 700.0);
        let start_gap = (Vec2::new(10.0, 3.0) - camera.center).length();
        camera.target_approach(Vec2::new(10.0, 3.0));
        let end_gap = (Vec2::new(10.0, 3.0) - camera.center).length();
        assert!(end_gap < start_gap);
    }

    #[test]
    fn camera_never_sinks_below_the_ground_frame() {
        let mut camera = Camera::new(Vec2::new(0.0, 3.0), 1200.0, 700.0);
        for _ in 0..1000 {
            camera.target_approach(Vec2::new(0.0, -20.0));
        }
        assert!(camera.center.y >= MIN_CENTER_HEIGHT - 1e-3);
    }

    #[test]
    fn visible_extent_matches_the_pixel_scale() {
        let camera = Camera::new(Vec2::ZERO, 1200.0, 700.0);
        let half = camera.half_extent();
        assert_eq!(half.x, 6.0);
        assert_eq!(half.y, 3.5);
    }
}
