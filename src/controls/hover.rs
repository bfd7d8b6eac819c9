//! Hover picking
//!
//! [`HoverControl`] casts a ray through the pointer on every move and feeds
//! the intersected indices to a [`HoverPicker`], which notifies its
//! subscribers only when the hovered set changes.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use super::{ready_viewer, Control};
use crate::gesture::GesturePayload;
use crate::math;
use crate::scene::{Raycast, SphereRaycaster};
use crate::viewer::Viewer;

pub type HoverCallback = Box<dyn FnMut(&[usize])>;

/// Remembers the last emitted hover list and notifies on change
#[derive(Default)]
pub struct HoverPicker {
    last: Vec<usize>,
    callbacks: Vec<HoverCallback>,
}

impl HoverPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to hover changes
    pub fn on_hover_changed<F>(&mut self, callback: F)
    where
        F: FnMut(&[usize]) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Last emitted index list, nearest first
    pub fn hovered(&self) -> &[usize] {
        &self.last
    }

    /// Record a new hit list. Returns true and notifies subscribers only
    /// when the set of indices differs from the last emitted one.
    pub fn update(&mut self, hits: Vec<usize>) -> bool {
        let new: BTreeSet<usize> = hits.iter().copied().collect();
        let old: BTreeSet<usize> = self.last.iter().copied().collect();
        if new == old {
            return false;
        }
        self.last = hits;
        for callback in &mut self.callbacks {
            callback(&self.last);
        }
        true
    }

    /// Forget the last list without notifying
    pub fn reset(&mut self) {
        self.last.clear();
    }
}

/// Pointer-move control running the hover ray cast
pub struct HoverControl {
    viewer: Weak<RefCell<Viewer>>,
    picker: Rc<RefCell<HoverPicker>>,
    raycaster: Box<dyn Raycast>,
}

impl HoverControl {
    pub fn new(viewer: Weak<RefCell<Viewer>>, picker: Rc<RefCell<HoverPicker>>) -> Self {
        Self::with_raycaster(viewer, picker, Box::new(SphereRaycaster))
    }

    pub fn with_raycaster(
        viewer: Weak<RefCell<Viewer>>,
        picker: Rc<RefCell<HoverPicker>>,
        raycaster: Box<dyn Raycast>,
    ) -> Self {
        Self {
            viewer,
            picker,
            raycaster,
        }
    }
}

impl Control for HoverControl {
    fn operate(&mut self, payload: &GesturePayload) {
        let GesturePayload::Position(position) = *payload else {
            return;
        };
        let Some(viewer) = ready_viewer(&self.viewer, self.name()) else {
            return;
        };
        let hits = {
            let viewer = viewer.borrow();
            let ndc = math::pixel_to_ndc(position, viewer.canvas_size());
            let ray = viewer.camera().ray_through_ndc(ndc);
            let objects = viewer.objects();
            self.raycaster.raycast(&ray, &objects)
        };
        // Subscribers may borrow the viewer, so it is released first
        self.picker
            .borrow_mut()
            .update(hits.into_iter().map(|hit| hit.index).collect());
    }

    fn name(&self) -> &'static str {
        "Hover"
    }
}

#[cfg(test)]
mod tests {
    use glam::{DVec2, DVec3};

    use super::super::test_util::viewer;
    use super::*;
    use crate::scene::MapObject;
    use crate::viewer::Dimensionality;

    fn counting_picker() -> (HoverPicker, Rc<RefCell<Vec<Vec<usize>>>>) {
        let mut picker = HoverPicker::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        picker.on_hover_changed(move |hits| sink.borrow_mut().push(hits.to_vec()));
        (picker, seen)
    }

    #[test]
    fn reordered_hits_emit_once() {
        let (mut picker, seen) = counting_picker();
        assert!(picker.update(vec![3, 1]));
        assert!(!picker.update(vec![1, 3]));
        assert_eq!(*seen.borrow(), vec![vec![3, 1]]);
    }

    #[test]
    fn leaving_all_objects_emits_empty_list() {
        let (mut picker, seen) = counting_picker();
        picker.update(vec![2]);
        picker.update(Vec::new());
        picker.update(Vec::new());
        assert_eq!(*seen.borrow(), vec![vec![2], vec![]]);
    }

    #[test]
    fn reset_clears_without_notifying() {
        let (mut picker, seen) = counting_picker();
        picker.update(vec![4]);
        picker.reset();
        assert!(picker.hovered().is_empty());
        assert!(picker.update(vec![4]));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn pointer_over_object_is_hovered() {
        let viewer = viewer(Dimensionality::Three);
        viewer.borrow().objects_mut().set_objects(vec![
            MapObject::at(DVec3::ZERO),
            MapObject::at(DVec3::new(0.0, 0.0, 3.0)),
            MapObject::at(DVec3::new(5.0, 5.0, 0.0)),
        ]);
        let picker = Rc::new(RefCell::new(HoverPicker::new()));
        let mut hover = HoverControl::new(Rc::downgrade(&viewer), Rc::clone(&picker));

        // canvas center looks straight at the origin
        hover.operate(&GesturePayload::Position(DVec2::new(100.0, 100.0)));
        assert_eq!(picker.borrow().hovered(), &[1, 0]);

        hover.operate(&GesturePayload::Position(DVec2::new(0.0, 0.0)));
        assert!(picker.borrow().hovered().is_empty());
    }

    #[test]
    fn empty_set_has_no_hits() {
        let viewer = viewer(Dimensionality::Two);
        viewer.borrow().objects_mut().set_objects(Vec::new());
        let picker = Rc::new(RefCell::new(HoverPicker::new()));
        let mut hover = HoverControl::new(Rc::downgrade(&viewer), Rc::clone(&picker));
        hover.operate(&GesturePayload::Position(DVec2::new(100.0, 100.0)));
        assert!(picker.borrow().hovered().is_empty());
    }
}
