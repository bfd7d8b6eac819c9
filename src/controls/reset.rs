//! Reset the view on a key press

use std::cell::RefCell;
use std::rc::Weak;

use super::{ready_viewer, Control};
use crate::config::ManipulatorConfig;
use crate::gesture::GesturePayload;
use crate::viewer::Viewer;

/// Restores the construction-time view when the configured key is pressed
pub struct ResetControl {
    viewer: Weak<RefCell<Viewer>>,
    key_code: u32,
}

impl ResetControl {
    pub fn new(viewer: Weak<RefCell<Viewer>>, config: &ManipulatorConfig) -> Self {
        Self {
            viewer,
            key_code: config.reset_key_code,
        }
    }
}

impl Control for ResetControl {
    fn operate(&mut self, payload: &GesturePayload) {
        match *payload {
            GesturePayload::Key(key_code) if key_code == self.key_code => {}
            _ => return,
        }
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        viewer.borrow_mut().reset();
    }

    fn name(&self) -> &'static str {
        "Reset"
    }
}
