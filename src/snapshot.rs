//! Viewer state snapshot / restore
//!
//! A [`ViewerStateSnapshot`] is a plain serde value capturing the camera pose,
//! the field of view (3D) or viewport (2D), and the object layout. It holds no
//! reference to a live viewer and is the JSON "save view" format.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{ViewerError, ViewerResult};
use crate::scene::MapObject;
use crate::viewer::{Dimensionality, Viewer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerStateSnapshot {
    pub number_of_dimensions: usize,
    pub camera_position: DVec3,
    pub camera_looking_at: DVec3,
    #[serde(default = "default_up")]
    pub camera_up: DVec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport_size: Option<DVec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport_rotation: Option<f64>,
    pub object_scale: f64,
    pub objects: Vec<MapObject>,
    pub diameter: f64,
    pub center: DVec3,
}

fn default_up() -> DVec3 {
    DVec3::Y
}

impl ViewerStateSnapshot {
    pub fn dimensionality(&self) -> ViewerResult<Dimensionality> {
        Dimensionality::try_from(self.number_of_dimensions)
    }

    pub fn to_json(&self) -> ViewerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> ViewerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Capture the current state of `viewer`
pub fn snapshot(viewer: &Viewer) -> ViewerStateSnapshot {
    let camera = viewer.camera();
    let objects = viewer.objects();
    let viewport = viewer.viewport();
    ViewerStateSnapshot {
        number_of_dimensions: viewer.dimensionality().count(),
        camera_position: camera.position,
        camera_looking_at: viewer.camera_looking_at(),
        camera_up: camera.up,
        fov: viewer.fov(),
        viewport_size: viewport.map(|vp| vp.size),
        viewport_rotation: viewport.map(|vp| vp.rotation),
        object_scale: objects.scale(),
        objects: objects.objects().to_vec(),
        diameter: objects.diameter(),
        center: objects.center(),
    }
}

/// Apply `snapshot` to `viewer`.
///
/// The dimensionality is validated before anything is touched, so a failed
/// restore leaves the viewer unchanged. The look-at target is applied after
/// the eye position so the orientation is derived from the restored eye.
pub fn restore(viewer: &mut Viewer, snapshot: &ViewerStateSnapshot) -> ViewerResult<()> {
    let dimensionality = snapshot.dimensionality()?;
    if dimensionality != viewer.dimensionality() {
        return Err(ViewerError::DimensionalityMismatch {
            snapshot: dimensionality.count(),
            viewer: viewer.dimensionality().count(),
        });
    }

    {
        let mut objects = viewer.objects_mut();
        objects.set_objects(snapshot.objects.clone());
        objects.set_scale(snapshot.object_scale);
        objects.set_bounds(snapshot.diameter, snapshot.center);
    }

    viewer.set_camera_position(snapshot.camera_position);
    viewer.set_camera_up(snapshot.camera_up);
    if let Some(fov) = snapshot.fov {
        viewer.set_fov(fov);
    }
    if let Some(viewport) = viewer.viewport_mut() {
        if let Some(size) = snapshot.viewport_size {
            viewport.size = size;
        }
        if let Some(rotation) = snapshot.viewport_rotation {
            viewport.rotation = rotation;
        }
    }

    viewer.look_at(snapshot.camera_looking_at);
    viewer.camera_update();
    viewer.objects_updated();
    log::debug!("Restored {dimensionality} viewer state");
    Ok(())
}
