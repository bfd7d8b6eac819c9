//! Pan controls

use std::cell::RefCell;
use std::rc::Weak;

use super::{ready_viewer, Control};
use crate::gesture::GesturePayload;
use crate::math::{self, OrbitDelta};
use crate::viewer::Viewer;

/// Drag the 2D viewport so the map follows the pointer
pub struct PanControl2d {
    viewer: Weak<RefCell<Viewer>>,
}

impl PanControl2d {
    pub fn new(viewer: Weak<RefCell<Viewer>>) -> Self {
        Self { viewer }
    }
}

impl Control for PanControl2d {
    fn operate(&mut self, payload: &GesturePayload) {
        let GesturePayload::Delta(delta) = *payload else {
            return;
        };
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        let mut viewer = viewer.borrow_mut();
        let canvas = viewer.canvas_size();
        let Some(viewport) = viewer.viewport_mut() else {
            return;
        };
        let offset = math::viewport_pan_offset(delta, viewport.size, canvas, viewport.rotation);
        viewport.pan(offset);
        viewer.camera_update();
    }

    fn name(&self) -> &'static str {
        "Pan2d"
    }
}

/// Translate eye and look-at target across the target plane of a
/// perspective camera
pub struct PanControl3d {
    viewer: Weak<RefCell<Viewer>>,
}

impl PanControl3d {
    pub fn new(viewer: Weak<RefCell<Viewer>>) -> Self {
        Self { viewer }
    }
}

impl Control for PanControl3d {
    fn operate(&mut self, payload: &GesturePayload) {
        let GesturePayload::Delta(delta) = *payload else {
            return;
        };
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        let mut viewer = viewer.borrow_mut();
        let Some(fov) = viewer.fov() else {
            return;
        };
        let units_per_pixel =
            math::perspective_units_per_pixel(fov, viewer.distance(), viewer.canvas_size().y);
        let (camera_x, camera_y) = viewer.camera().basis();
        let offset = math::perspective_pan_offset(delta, units_per_pixel, camera_x, camera_y);
        viewer.orbit(OrbitDelta::pan(offset));
        viewer.camera_update();
    }

    fn name(&self) -> &'static str {
        "Pan3d"
    }
}
