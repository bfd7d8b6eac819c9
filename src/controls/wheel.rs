//! Wheel-driven ratio controls: zoom, object scale and field of view
//!
//! A positive wheel delta applies the configured ratio, a negative one its
//! reciprocal, and a zero delta is a no-op.

use std::cell::RefCell;
use std::rc::Weak;

use super::{ready_viewer, Control};
use crate::config::ManipulatorConfig;
use crate::gesture::GesturePayload;
use crate::math::OrbitDelta;
use crate::viewer::{Dimensionality, Viewer};

fn wheel_y(payload: &GesturePayload) -> Option<f64> {
    match payload {
        GesturePayload::Wheel(delta) if delta.y != 0.0 => Some(delta.y),
        _ => None,
    }
}

/// 2D: shrink / grow the visible extent. 3D: move the eye along the view
/// direction and rescale the objects by the same ratio.
pub struct ZoomControl {
    viewer: Weak<RefCell<Viewer>>,
    ratio: f64,
}

impl ZoomControl {
    pub fn new(viewer: Weak<RefCell<Viewer>>, config: &ManipulatorConfig) -> Self {
        Self {
            viewer,
            ratio: config.zoom_ratio,
        }
    }
}

impl Control for ZoomControl {
    fn operate(&mut self, payload: &GesturePayload) {
        let Some(dy) = wheel_y(payload) else {
            return;
        };
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        let mut viewer = viewer.borrow_mut();
        let ratio = ManipulatorConfig::wheel_ratio(self.ratio, dy);
        match viewer.dimensionality() {
            Dimensionality::Two => {
                if let Some(viewport) = viewer.viewport_mut() {
                    viewport.zoom(ratio);
                }
            }
            Dimensionality::Three => {
                viewer.orbit(OrbitDelta::dolly(ratio));
                viewer.objects_mut().multiply_scale(ratio);
                viewer.objects_updated();
            }
        }
        viewer.camera_update();
    }

    fn name(&self) -> &'static str {
        "Zoom"
    }
}

/// Resize every marker without moving the camera
pub struct ScaleControl {
    viewer: Weak<RefCell<Viewer>>,
    ratio: f64,
}

impl ScaleControl {
    pub fn new(viewer: Weak<RefCell<Viewer>>, config: &ManipulatorConfig) -> Self {
        Self {
            viewer,
            ratio: config.scale_ratio,
        }
    }
}

impl Control for ScaleControl {
    fn operate(&mut self, payload: &GesturePayload) {
        let Some(dy) = wheel_y(payload) else {
            return;
        };
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        let mut viewer = viewer.borrow_mut();
        viewer
            .objects_mut()
            .multiply_scale(ManipulatorConfig::wheel_ratio(self.ratio, dy));
        viewer.objects_updated();
        viewer.camera_update();
    }

    fn name(&self) -> &'static str {
        "Scale"
    }
}

/// Change the perspective field of view, compensating the eye distance so
/// the apparent object size stays roughly the same
pub struct FovControl {
    viewer: Weak<RefCell<Viewer>>,
    ratio: f64,
    min: f64,
    max: f64,
}

impl FovControl {
    pub fn new(viewer: Weak<RefCell<Viewer>>, config: &ManipulatorConfig) -> Self {
        Self {
            viewer,
            ratio: config.fov_ratio,
            min: config.fov_min,
            max: config.fov_max,
        }
    }
}

impl Control for FovControl {
    fn operate(&mut self, payload: &GesturePayload) {
        let Some(dy) = wheel_y(payload) else {
            return;
        };
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        let mut viewer = viewer.borrow_mut();
        let Some(fov) = viewer.fov() else {
            return;
        };
        let ratio = ManipulatorConfig::wheel_ratio(self.ratio, dy);
        let new_fov = (fov * ratio).clamp(self.min, self.max);
        // Ratio actually applied after clamping
        let applied = new_fov / fov;
        if applied == 1.0 {
            return;
        }
        viewer.set_fov(new_fov);
        viewer.orbit(OrbitDelta::dolly(1.0 / applied));
        viewer.camera_update();
    }

    fn name(&self) -> &'static str {
        "FieldOfView"
    }
}
