//! Mirror the 2D map on a key press

use std::cell::RefCell;
use std::rc::Weak;

use super::{ready_viewer, Control};
use crate::config::ManipulatorConfig;
use crate::gesture::GesturePayload;
use crate::scene::FlipAxis;
use crate::viewer::{Dimensionality, Viewer};

pub struct FlipControl {
    viewer: Weak<RefCell<Viewer>>,
    horizontal_key: u32,
    vertical_key: u32,
}

impl FlipControl {
    pub fn new(viewer: Weak<RefCell<Viewer>>, config: &ManipulatorConfig) -> Self {
        Self {
            viewer,
            horizontal_key: config.flip_horizontal_key,
            vertical_key: config.flip_vertical_key,
        }
    }

    fn axis(&self, key_code: u32) -> Option<FlipAxis> {
        if key_code == self.horizontal_key {
            Some(FlipAxis::Horizontal)
        } else if key_code == self.vertical_key {
            Some(FlipAxis::Vertical)
        } else {
            None
        }
    }
}

impl Control for FlipControl {
    fn operate(&mut self, payload: &GesturePayload) {
        let GesturePayload::Key(key_code) = *payload else {
            return;
        };
        let Some(axis) = self.axis(key_code) else {
            return;
        };
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        let mut viewer = viewer.borrow_mut();
        if viewer.dimensionality() != Dimensionality::Two {
            return;
        }
        log::debug!("Flipping map {axis:?}");
        viewer.objects_mut().flip(axis);
        viewer.objects_updated();
        viewer.camera_update();
    }

    fn name(&self) -> &'static str {
        "Flip"
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use glam::DVec3;

    use super::super::test_util::viewer;
    use super::*;
    use crate::config::{KEY_H, KEY_R, KEY_V};

    #[test]
    fn flip_keys_mirror_around_center() {
        let viewer = viewer(Dimensionality::Two);
        let mut flip = FlipControl::new(Rc::downgrade(&viewer), &ManipulatorConfig::default());
        let generation = viewer.borrow().pose_generation();

        flip.operate(&GesturePayload::Key(KEY_H));
        assert_eq!(
            viewer.borrow().objects().get(0).unwrap().position,
            DVec3::new(1.0, -1.0, 0.0)
        );
        flip.operate(&GesturePayload::Key(KEY_V));
        assert_eq!(
            viewer.borrow().objects().get(0).unwrap().position,
            DVec3::new(1.0, 1.0, 0.0)
        );
        assert_eq!(viewer.borrow().pose_generation(), generation + 2);
    }

    #[test]
    fn other_keys_do_nothing() {
        let viewer = viewer(Dimensionality::Two);
        let mut flip = FlipControl::new(Rc::downgrade(&viewer), &ManipulatorConfig::default());
        flip.operate(&GesturePayload::Key(KEY_R));
        assert_eq!(
            viewer.borrow().objects().get(0).unwrap().position,
            DVec3::new(-1.0, -1.0, 0.0)
        );
    }
}
