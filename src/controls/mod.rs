//! Manipulator controls
//!
//! A control turns the payload of one bound gesture into a viewer mutation.
//! Controls hold a [`Weak`] handle to their viewer: the viewer never owns the
//! controls that drive it, and a control outliving its viewer becomes a
//! logged no-op.

mod flip;
mod hover;
mod orbit;
mod pan;
mod reset;
mod wheel;

pub use flip::*;
pub use hover::*;
pub use orbit::*;
pub use pan::*;
pub use reset::*;
pub use wheel::*;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::ManipulatorConfig;
use crate::error::ViewerResult;
use crate::gesture::{GestureDispatcher, GesturePayload, ListenerId};
use crate::viewer::{Dimensionality, Viewer};

/// Input-to-viewer operation bound to one gesture
pub trait Control {
    /// Apply one gesture payload. Payload kinds a control does not use are
    /// ignored.
    fn operate(&mut self, payload: &GesturePayload);

    /// Control name for logging
    fn name(&self) -> &'static str;
}

/// Bind `control` to the gesture `spec`; unbinding the returned listener
/// drops the control.
pub fn bind_control<C>(
    dispatcher: &mut GestureDispatcher,
    spec: &str,
    mut control: C,
) -> ViewerResult<ListenerId>
where
    C: Control + 'static,
{
    log::debug!("Binding {} control to {spec}", control.name());
    dispatcher.bind(spec, move |payload| control.operate(payload))
}

/// Upgrade a control's viewer handle, skipping viewers that are gone or not
/// yet initialized
pub(crate) fn ready_viewer(
    viewer: &Weak<RefCell<Viewer>>,
    control: &'static str,
) -> Option<Rc<RefCell<Viewer>>> {
    let Some(viewer) = viewer.upgrade() else {
        log::warn!("{control} control outlived its viewer");
        return None;
    };
    if !viewer.borrow().is_ready() {
        log::debug!("{control} control skipped, viewer not initialized");
        return None;
    }
    Some(viewer)
}

/// Operations a default gesture binding can name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Pan,
    Orbit,
    Rotate,
    Zoom,
    Scale,
    Flip,
    FieldOfView,
    Reset,
    Hover,
}

const BINDINGS_2D: &[(&str, ControlKind)] = &[
    ("drag", ControlKind::Pan),
    ("wheel", ControlKind::Zoom),
    ("wheel:shift", ControlKind::Scale),
    ("wheel:alt", ControlKind::Rotate),
    ("key", ControlKind::Flip),
    ("key", ControlKind::Reset),
    ("move", ControlKind::Hover),
];

const BINDINGS_3D: &[(&str, ControlKind)] = &[
    ("drag", ControlKind::Orbit),
    ("drag:shift", ControlKind::Pan),
    ("wheel", ControlKind::Zoom),
    ("wheel:shift", ControlKind::Scale),
    ("wheel:alt", ControlKind::FieldOfView),
    ("key", ControlKind::Reset),
    ("move", ControlKind::Hover),
];

/// Gesture spec / operation pairs installed by default for a viewer
pub fn default_bindings(dimensionality: Dimensionality) -> &'static [(&'static str, ControlKind)] {
    match dimensionality {
        Dimensionality::Two => BINDINGS_2D,
        Dimensionality::Three => BINDINGS_3D,
    }
}

impl ControlKind {
    /// Build the control for this operation. Returns `None` for operations
    /// that do not exist for the viewer's dimensionality.
    pub fn build(
        &self,
        viewer: &Rc<RefCell<Viewer>>,
        config: &ManipulatorConfig,
        hover: &Rc<RefCell<HoverPicker>>,
    ) -> Option<Box<dyn Control>> {
        let dimensionality = viewer.borrow().dimensionality();
        let handle = Rc::downgrade(viewer);
        let control: Box<dyn Control> = match (self, dimensionality) {
            (ControlKind::Pan, Dimensionality::Two) => Box::new(PanControl2d::new(handle)),
            (ControlKind::Pan, Dimensionality::Three) => Box::new(PanControl3d::new(handle)),
            (ControlKind::Orbit, Dimensionality::Three) => {
                Box::new(OrbitControl::new(handle, config))
            }
            (ControlKind::Rotate, Dimensionality::Two) => {
                Box::new(RotateControl2d::new(handle, config))
            }
            (ControlKind::Zoom, _) => Box::new(ZoomControl::new(handle, config)),
            (ControlKind::Scale, _) => Box::new(ScaleControl::new(handle, config)),
            (ControlKind::Flip, Dimensionality::Two) => Box::new(FlipControl::new(handle, config)),
            (ControlKind::FieldOfView, Dimensionality::Three) => {
                Box::new(FovControl::new(handle, config))
            }
            (ControlKind::Reset, _) => Box::new(ResetControl::new(handle, config)),
            (ControlKind::Hover, _) => Box::new(HoverControl::new(handle, Rc::clone(hover))),
            _ => return None,
        };
        Some(control)
    }
}

impl Control for Box<dyn Control> {
    fn operate(&mut self, payload: &GesturePayload) {
        (**self).operate(payload)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::{DVec2, DVec3};

    use crate::config::ManipulatorConfig;
    use crate::scene::{MapObject, ObjectSet};
    use crate::viewer::{Dimensionality, Viewer, Viewport2d};

    pub fn objects() -> Rc<RefCell<ObjectSet>> {
        Rc::new(RefCell::new(ObjectSet::new(vec![
            MapObject::at(DVec3::new(-1.0, -1.0, 0.0)),
            MapObject::at(DVec3::new(1.0, 1.0, 0.0)),
        ])))
    }

    pub fn viewer(dimensionality: Dimensionality) -> Rc<RefCell<Viewer>> {
        let viewport = Viewport2d::new(DVec2::ZERO, DVec2::splat(20.0));
        let mut viewer = Viewer::new(
            dimensionality,
            &ManipulatorConfig::default(),
            objects(),
            Some(viewport),
        );
        viewer.initialize(DVec2::new(200.0, 200.0));
        Rc::new(RefCell::new(viewer))
    }
}
