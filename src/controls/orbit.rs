//! Orbit (3D) and viewport rotation (2D)

use std::cell::RefCell;
use std::rc::Weak;

use super::{ready_viewer, Control};
use crate::config::ManipulatorConfig;
use crate::gesture::GesturePayload;
use crate::math::{self, OrbitDelta};
use crate::viewer::Viewer;

/// Revolve the camera around its look-at target on drag
pub struct OrbitControl {
    viewer: Weak<RefCell<Viewer>>,
    rotate_speed: f64,
}

impl OrbitControl {
    pub fn new(viewer: Weak<RefCell<Viewer>>, config: &ManipulatorConfig) -> Self {
        Self {
            viewer,
            rotate_speed: config.rotate_speed,
        }
    }
}

impl Control for OrbitControl {
    fn operate(&mut self, payload: &GesturePayload) {
        let GesturePayload::Delta(delta) = *payload else {
            return;
        };
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        let mut viewer = viewer.borrow_mut();
        let (theta, phi) = math::orbit_angles(delta, viewer.canvas_size(), self.rotate_speed);
        if let Some(spherical) = viewer.orbit(OrbitDelta::rotate(theta, phi)) {
            log::trace!("Orbit to theta {} phi {}", spherical.theta, spherical.phi);
        }
        viewer.camera_update();
    }

    fn name(&self) -> &'static str {
        "Orbit"
    }
}

/// Rotate the 2D viewport around its center on wheel
pub struct RotateControl2d {
    viewer: Weak<RefCell<Viewer>>,
    speed: f64,
}

impl RotateControl2d {
    pub fn new(viewer: Weak<RefCell<Viewer>>, config: &ManipulatorConfig) -> Self {
        Self {
            viewer,
            speed: config.rotate_2d_speed,
        }
    }
}

impl Control for RotateControl2d {
    fn operate(&mut self, payload: &GesturePayload) {
        let GesturePayload::Wheel(delta) = *payload else {
            return;
        };
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        let mut viewer = viewer.borrow_mut();
        let Some(viewport) = viewer.viewport_mut() else {
            return;
        };
        viewport.rotate(delta.y * self.speed);
        viewer.camera_update();
    }

    fn name(&self) -> &'static str {
        "Rotate2d"
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{PI, TAU};
    use std::rc::Rc;

    use glam::DVec2;

    use super::super::test_util::viewer;
    use super::*;
    use crate::viewer::Dimensionality;

    #[test]
    fn quarter_canvas_drag_turns_quarter_circle() {
        let viewer = viewer(Dimensionality::Three);
        let mut control = OrbitControl::new(Rc::downgrade(&viewer), &ManipulatorConfig::default());
        control.operate(&GesturePayload::Delta(DVec2::new(50.0, 0.0)));
        let position = viewer.borrow().camera().position;
        assert!((position.x + 10.0).abs() < 1e-9);
        assert!(position.z.abs() < 1e-9);
        assert!((position.length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn long_vertical_drags_stay_finite() {
        let viewer = viewer(Dimensionality::Three);
        let mut control = OrbitControl::new(Rc::downgrade(&viewer), &ManipulatorConfig::default());
        for _ in 0..10 {
            control.operate(&GesturePayload::Delta(DVec2::new(0.0, 400.0)));
        }
        let camera = viewer.borrow().camera().clone();
        assert!(camera.position.is_finite());
        assert!((camera.distance() - 10.0).abs() < 1e-6);
        let up_angle = (camera.position - camera.target).angle_between(camera.up);
        assert!(up_angle > 0.0 && up_angle < PI);
    }

    #[test]
    fn wheel_rotates_viewport_without_clamp() {
        let viewer = viewer(Dimensionality::Two);
        let mut control = RotateControl2d::new(Rc::downgrade(&viewer), &ManipulatorConfig::default());
        for _ in 0..30 {
            control.operate(&GesturePayload::Wheel(DVec2::new(0.0, 10.0)));
        }
        let rotation = viewer.borrow().viewport().unwrap().rotation;
        assert!((rotation - 15.0).abs() < 1e-9);
        assert!(rotation > TAU);
    }
}
