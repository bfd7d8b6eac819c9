//! Camera rig / viewer
//!
//! A [`Viewer`] owns the camera, its look-at target and (in 3D) the field of
//! view. The 2D variant drives an orthographic camera from a [`Viewport2d`];
//! the 3D variant orbits a perspective camera around its target.
//!
//! State machine: `Uninitialized` until [`Viewer::initialize`] builds the
//! camera and projection, then `Ready` for the rest of its life. Every
//! mutation must be followed by [`Viewer::camera_update`] before the next
//! frame; the controls do this themselves.

mod orbit3d;
mod viewport2d;

pub use orbit3d::*;
pub use viewport2d::*;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use glam::{DMat3, DQuat, DVec2, DVec3};

use crate::config::ManipulatorConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::math::{self, OrbitDelta, Spherical};
use crate::scene::{Camera, CameraUniformData, ObjectSet, Projection};

/// Number of dimensions of a map / viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimensionality {
    Two,
    Three,
}

impl Dimensionality {
    pub fn count(&self) -> usize {
        match self {
            Dimensionality::Two => 2,
            Dimensionality::Three => 3,
        }
    }
}

impl TryFrom<usize> for Dimensionality {
    type Error = ViewerError;

    fn try_from(value: usize) -> ViewerResult<Self> {
        match value {
            2 => Ok(Dimensionality::Two),
            3 => Ok(Dimensionality::Three),
            other => Err(ViewerError::ConfigurationError {
                dimensionality: other,
            }),
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.count())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Uninitialized,
    Ready,
}

/// Projection-specific part of a viewer
#[derive(Debug, Clone)]
enum Rig {
    TwoD(Viewport2d),
    ThreeD(OrbitRig),
}

pub struct Viewer {
    state: ViewerState,
    camera: Camera,
    rig: Rig,
    orientation: DQuat,
    canvas_size: DVec2,
    objects: Rc<RefCell<ObjectSet>>,
    config: ManipulatorConfig,
    pose_generation: u64,
}

impl Viewer {
    /// Create an uninitialized viewer for `objects`.
    ///
    /// A 2D viewer frames `viewport` when given, otherwise a square around
    /// the object set bounds.
    pub fn new(
        dimensionality: Dimensionality,
        config: &ManipulatorConfig,
        objects: Rc<RefCell<ObjectSet>>,
        viewport: Option<Viewport2d>,
    ) -> Self {
        let rig = match dimensionality {
            Dimensionality::Two => Rig::TwoD(viewport.unwrap_or_else(|| {
                let set = objects.borrow();
                Viewport2d::enclosing(set.center(), set.diameter())
            })),
            Dimensionality::Three => Rig::ThreeD(OrbitRig::new(
                config.initial_camera_position,
                config.initial_look_at,
                config.world_up,
                config.initial_fov,
            )),
        };

        Self {
            state: ViewerState::Uninitialized,
            camera: Camera::default(),
            rig,
            orientation: DQuat::IDENTITY,
            canvas_size: DVec2::new(1.0, 1.0),
            objects,
            config: config.clone(),
            pose_generation: 0,
        }
    }

    /// Build camera and projection for a canvas of `canvas_size` pixels
    pub fn initialize(&mut self, canvas_size: DVec2) {
        self.canvas_size = canvas_size.max(DVec2::ONE);
        let aspect = self.canvas_size.x / self.canvas_size.y;
        self.camera = match &self.rig {
            Rig::TwoD(viewport) => {
                let mut camera = Camera::new(
                    DVec3::ZERO,
                    DVec3::NEG_Z,
                    self.config.world_up,
                    Projection::orthographic(viewport.size.x, viewport.size.y, 0.1, 1000.0),
                );
                viewport.apply_to(&mut camera, self.config.world_up);
                camera
            }
            Rig::ThreeD(rig) => Camera::new(
                rig.initial_position,
                rig.initial_target,
                rig.initial_up,
                Projection::perspective(rig.initial_fov, aspect, 0.1, 1000.0),
            ),
        };
        self.state = ViewerState::Ready;
        log::info!(
            "{} viewer ready ({}x{} canvas)",
            self.dimensionality(),
            self.canvas_size.x,
            self.canvas_size.y
        );
        self.camera_update();
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ViewerState::Ready
    }

    pub fn dimensionality(&self) -> Dimensionality {
        match self.rig {
            Rig::TwoD(_) => Dimensionality::Two,
            Rig::ThreeD(_) => Dimensionality::Three,
        }
    }

    pub fn config(&self) -> &ManipulatorConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Option<&Viewport2d> {
        match &self.rig {
            Rig::TwoD(viewport) => Some(viewport),
            Rig::ThreeD(_) => None,
        }
    }

    pub fn viewport_mut(&mut self) -> Option<&mut Viewport2d> {
        match &mut self.rig {
            Rig::TwoD(viewport) => Some(viewport),
            Rig::ThreeD(_) => None,
        }
    }

    /// Orientation of the grid helper plane (3D only)
    pub fn grid_orientation(&self) -> Option<DQuat> {
        match &self.rig {
            Rig::ThreeD(rig) => Some(rig.grid_orientation),
            Rig::TwoD(_) => None,
        }
    }

    /// Camera orientation as last computed by [`camera_update`](Self::camera_update)
    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    /// Incremented by every [`camera_update`](Self::camera_update)
    pub fn pose_generation(&self) -> u64 {
        self.pose_generation
    }

    pub fn canvas_size(&self) -> DVec2 {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: DVec2) {
        self.canvas_size = size.max(DVec2::ONE);
        self.camera.set_aspect(self.canvas_size.x, self.canvas_size.y);
    }

    pub fn objects(&self) -> Ref<'_, ObjectSet> {
        self.objects.borrow()
    }

    pub fn objects_mut(&self) -> RefMut<'_, ObjectSet> {
        self.objects.borrow_mut()
    }

    pub fn objects_updated(&self) {
        self.objects.borrow_mut().objects_updated();
    }

    pub fn camera_looking_at(&self) -> DVec3 {
        self.camera.target
    }

    /// Distance from the eye to the look-at target
    pub fn distance(&self) -> f64 {
        self.camera.distance()
    }

    pub fn fov(&self) -> Option<f64> {
        self.camera.projection.fov()
    }

    pub fn set_fov(&mut self, fov: f64) {
        self.camera.projection.set_fov(fov);
    }

    pub fn set_camera_position(&mut self, position: DVec3) {
        self.camera.set_position(position);
    }

    pub fn set_camera_up(&mut self, up: DVec3) {
        if let Some(up) = up.try_normalize() {
            self.camera.up = up;
        }
    }

    /// Aim the camera at `target`. In 2D this recenters the viewport.
    pub fn look_at(&mut self, target: DVec3) {
        if let Rig::TwoD(viewport) = &mut self.rig {
            viewport.center = target.truncate();
        }
        self.camera.look_at(target);
    }

    /// Re-derive the camera orientation from the current look-at target
    pub fn camera_update(&mut self) {
        match &mut self.rig {
            Rig::TwoD(viewport) => viewport.apply_to(&mut self.camera, self.config.world_up),
            Rig::ThreeD(rig) => {
                rig.update_grid(self.camera.position, self.camera.target, self.camera.up)
            }
        }
        self.orientation = look_rotation(&self.camera);
        self.pose_generation += 1;
    }

    /// Restore the construction-time pose, field of view and object scale
    pub fn reset(&mut self) {
        match &mut self.rig {
            Rig::TwoD(viewport) => viewport.reset(),
            Rig::ThreeD(rig) => {
                self.camera.position = rig.initial_position;
                self.camera.target = rig.initial_target;
                self.camera.up = rig.initial_up;
                self.camera.projection.set_fov(rig.initial_fov);
            }
        }
        self.objects.borrow_mut().set_scale(1.0);
        log::debug!("{} viewer reset", self.dimensionality());
        self.objects_updated();
        self.camera_update();
    }

    /// Apply an orbit update (3D). Returns the clamped spherical coordinates.
    pub fn orbit(&mut self, delta: OrbitDelta) -> Option<Spherical> {
        if !matches!(self.rig, Rig::ThreeD(_)) {
            return None;
        }
        let pose = math::orbit(
            self.camera.position,
            self.camera.target,
            self.camera.up,
            self.config.world_up,
            delta,
            self.config.pole_epsilon,
        );
        self.camera.position = pose.position;
        self.camera.target = pose.target;
        Some(pose.spherical)
    }

    /// Camera data for the render loop
    pub fn uniform_data(&self) -> CameraUniformData {
        self.camera.uniform_data()
    }
}

impl fmt::Debug for Viewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewer")
            .field("state", &self.state)
            .field("camera", &self.camera)
            .field("rig", &self.rig)
            .field("canvas_size", &self.canvas_size)
            .finish_non_exhaustive()
    }
}

/// Rotation taking the camera's local frame (looking down -Z) to world space
fn look_rotation(camera: &Camera) -> DQuat {
    let Some(back) = (camera.position - camera.target).try_normalize() else {
        return DQuat::IDENTITY;
    };
    let Some(right) = camera.up.cross(back).try_normalize() else {
        return DQuat::from_rotation_arc(DVec3::Z, back);
    };
    let up = back.cross(right);
    DQuat::from_mat3(&DMat3::from_cols(right, up, back))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MapObject;

    fn objects() -> Rc<RefCell<ObjectSet>> {
        Rc::new(RefCell::new(ObjectSet::new(vec![
            MapObject::at(DVec3::new(-2.0, -1.0, 0.0)),
            MapObject::at(DVec3::new(2.0, 1.0, 0.0)),
        ])))
    }

    fn viewer_3d() -> Viewer {
        let mut viewer = Viewer::new(
            Dimensionality::Three,
            &ManipulatorConfig::default(),
            objects(),
            None,
        );
        viewer.initialize(DVec2::new(800.0, 600.0));
        viewer
    }

    #[test]
    fn starts_uninitialized() {
        let viewer = Viewer::new(Dimensionality::Two, &ManipulatorConfig::default(), objects(), None);
        assert_eq!(viewer.state(), ViewerState::Uninitialized);
    }

    #[test]
    fn initialize_makes_ready() {
        let viewer = viewer_3d();
        assert!(viewer.is_ready());
        assert_eq!(viewer.fov(), Some(75.0));
        assert_eq!(viewer.camera().position, DVec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn dimensionality_from_count() {
        assert_eq!(Dimensionality::try_from(2).unwrap(), Dimensionality::Two);
        assert_eq!(Dimensionality::try_from(3).unwrap(), Dimensionality::Three);
        assert!(matches!(
            Dimensionality::try_from(4),
            Err(ViewerError::ConfigurationError { dimensionality: 4 })
        ));
    }

    #[test]
    fn camera_update_orients_towards_target() {
        let mut viewer = viewer_3d();
        viewer.orbit(OrbitDelta::rotate(0.8, 0.4));
        viewer.camera_update();
        let forward = viewer.orientation() * DVec3::NEG_Z;
        assert!((forward - viewer.camera().forward()).length() < 1e-9);
        let grid_normal = viewer.grid_orientation().unwrap() * DVec3::Z;
        assert!((grid_normal + viewer.camera().forward()).length() < 1e-9);
    }

    #[test]
    fn reset_restores_pose_and_scale() {
        let mut viewer = viewer_3d();
        viewer.orbit(OrbitDelta::rotate(1.0, 0.5));
        viewer.set_fov(30.0);
        viewer.objects_mut().set_scale(3.0);
        let generation = viewer.objects().generation();
        viewer.reset();
        assert!((viewer.camera().position - DVec3::new(0.0, 0.0, 10.0)).length() < 1e-12);
        assert_eq!(viewer.fov(), Some(75.0));
        assert_eq!(viewer.objects().scale(), 1.0);
        assert_eq!(viewer.objects().generation(), generation + 1);
    }

    #[test]
    fn default_2d_viewport_encloses_objects() {
        let mut viewer =
            Viewer::new(Dimensionality::Two, &ManipulatorConfig::default(), objects(), None);
        viewer.initialize(DVec2::new(100.0, 100.0));
        let viewport = viewer.viewport().unwrap();
        assert_eq!(viewport.center, DVec2::ZERO);
        assert!((viewport.size.x - 20f64.sqrt()).abs() < 1e-12);
        assert_eq!(viewer.camera_looking_at(), DVec3::ZERO);
    }

    #[test]
    fn orbit_is_3d_only() {
        let mut viewer =
            Viewer::new(Dimensionality::Two, &ManipulatorConfig::default(), objects(), None);
        viewer.initialize(DVec2::new(100.0, 100.0));
        assert!(viewer.orbit(OrbitDelta::rotate(1.0, 0.0)).is_none());
    }
}
