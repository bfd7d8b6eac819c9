//! 3D orbit rig

use glam::{DMat3, DQuat, DVec3};

/// Construction-time pose of a 3D viewer plus the grid helper orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRig {
    pub initial_position: DVec3,
    pub initial_target: DVec3,
    pub initial_up: DVec3,
    pub initial_fov: f64,
    /// Orientation of the background grid plane; its normal faces the eye
    pub grid_orientation: DQuat,
}

impl OrbitRig {
    pub fn new(position: DVec3, target: DVec3, up: DVec3, fov: f64) -> Self {
        Self {
            initial_position: position,
            initial_target: target,
            initial_up: up,
            initial_fov: fov,
            grid_orientation: plane_orientation(position, target, up),
        }
    }

    /// Re-face the grid plane towards the eye
    pub fn update_grid(&mut self, position: DVec3, target: DVec3, up: DVec3) {
        self.grid_orientation = plane_orientation(position, target, up);
    }
}

/// Rotation taking +Z to the direction from `target` to `eye`, with +Y as
/// close to `up` as possible
pub fn plane_orientation(eye: DVec3, target: DVec3, up: DVec3) -> DQuat {
    let Some(normal) = (eye - target).try_normalize() else {
        return DQuat::IDENTITY;
    };
    let Some(right) = up.cross(normal).try_normalize() else {
        return DQuat::from_rotation_arc(DVec3::Z, normal);
    };
    let plane_up = normal.cross(right);
    DQuat::from_mat3(&DMat3::from_cols(right, plane_up, normal))
}
