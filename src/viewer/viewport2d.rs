//! 2D viewport rig

use glam::{DQuat, DVec2, DVec3};

use crate::scene::{Camera, Projection};

/// Height of the 2D eye above the map plane
pub const CAMERA_2D_HEIGHT: f64 = 10.0;

/// Visible world rectangle of a 2D map, independent of canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport2d {
    pub center: DVec2,
    pub size: DVec2,
    /// Rotation of the view around the map normal, radians
    pub rotation: f64,
    initial_center: DVec2,
    initial_size: DVec2,
}

impl Viewport2d {
    pub fn new(center: DVec2, size: DVec2) -> Self {
        Self {
            center,
            size,
            rotation: 0.0,
            initial_center: center,
            initial_size: size,
        }
    }

    /// Create from the lower-left origin and size of plot data
    pub fn from_origin(origin: DVec2, size: DVec2) -> Self {
        Self::new(origin + size / 2.0, size)
    }

    /// Square viewport enclosing a set with the given bounds
    pub fn enclosing(center: DVec3, diameter: f64) -> Self {
        let side = if diameter > 0.0 { diameter } else { 1.0 };
        Self::new(center.truncate(), DVec2::splat(side))
    }

    pub fn reset(&mut self) {
        self.center = self.initial_center;
        self.size = self.initial_size;
        self.rotation = 0.0;
    }

    pub fn pan(&mut self, offset: DVec2) {
        self.center += offset;
    }

    /// Scale the visible extent, `ratio < 1` zooms in
    pub fn zoom(&mut self, ratio: f64) {
        self.size *= ratio;
    }

    pub fn rotate(&mut self, angle: f64) {
        self.rotation += angle;
    }

    /// Place `camera` above the viewport center, looking straight down
    pub fn apply_to(&self, camera: &mut Camera, world_up: DVec3) {
        camera.position = self.center.extend(CAMERA_2D_HEIGHT);
        camera.target = self.center.extend(0.0);
        camera.up = DQuat::from_rotation_z(self.rotation) * world_up;
        if matches!(camera.projection, Projection::Orthographic { .. }) {
            camera.projection.set_extent(self.size);
        } else {
            camera.projection =
                Projection::orthographic(self.size.x, self.size.y, 0.1, CAMERA_2D_HEIGHT * 100.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_lower_left() {
        let vp = Viewport2d::from_origin(DVec2::new(-5.0, -4.0), DVec2::new(10.0, 8.0));
        assert_eq!(vp.center, DVec2::ZERO);
    }

    #[test]
    fn reset_restores_initial() {
        let mut vp = Viewport2d::new(DVec2::new(1.0, 1.0), DVec2::splat(10.0));
        vp.pan(DVec2::new(3.0, 0.0));
        vp.zoom(0.5);
        vp.rotate(1.0);
        vp.reset();
        assert_eq!(vp, Viewport2d::new(DVec2::new(1.0, 1.0), DVec2::splat(10.0)));
    }

    #[test]
    fn camera_follows_viewport() {
        let mut camera = Camera::default();
        let mut vp = Viewport2d::new(DVec2::new(2.0, 3.0), DVec2::new(20.0, 10.0));
        vp.rotate(std::f64::consts::FRAC_PI_2);
        vp.apply_to(&mut camera, DVec3::Y);
        assert_eq!(camera.target, DVec3::new(2.0, 3.0, 0.0));
        assert!((camera.up - DVec3::NEG_X).length() < 1e-12);
        assert_eq!(
            camera.projection,
            Projection::orthographic(20.0, 10.0, 0.1, 1000.0)
        );
    }
}
