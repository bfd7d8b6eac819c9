//! Camera system

use bytemuck::{Pod, Zeroable};
use glam::{DMat4, DVec2, DVec3, Mat4, Vec4};

use super::Ray;

/// Camera projection type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees
        fov_y: f64,
        aspect: f64,
        near: f64,
        far: f64,
    },
    Orthographic {
        width: f64,
        height: f64,
        near: f64,
        far: f64,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov_y: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn perspective(fov_y_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        Projection::Perspective {
            fov_y: fov_y_degrees,
            aspect,
            near,
            far,
        }
    }

    pub fn orthographic(width: f64, height: f64, near: f64, far: f64) -> Self {
        Projection::Orthographic {
            width,
            height,
            near,
            far,
        }
    }

    pub fn matrix(&self) -> DMat4 {
        match self {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => DMat4::perspective_rh(fov_y.to_radians(), *aspect, *near, *far),
            Projection::Orthographic {
                width,
                height,
                near,
                far,
            } => {
                let half_w = width / 2.0;
                let half_h = height / 2.0;
                DMat4::orthographic_rh(-half_w, half_w, -half_h, half_h, *near, *far)
            }
        }
    }

    pub fn near(&self) -> f64 {
        match self {
            Projection::Perspective { near, .. } => *near,
            Projection::Orthographic { near, .. } => *near,
        }
    }

    pub fn far(&self) -> f64 {
        match self {
            Projection::Perspective { far, .. } => *far,
            Projection::Orthographic { far, .. } => *far,
        }
    }

    /// Field of view in degrees, perspective only
    pub fn fov(&self) -> Option<f64> {
        match self {
            Projection::Perspective { fov_y, .. } => Some(*fov_y),
            Projection::Orthographic { .. } => None,
        }
    }

    pub fn set_fov(&mut self, fov: f64) {
        if let Projection::Perspective { fov_y, .. } = self {
            *fov_y = fov;
        }
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if let Projection::Perspective { aspect: a, .. } = self {
            *a = aspect;
        }
    }

    pub fn set_extent(&mut self, extent: DVec2) {
        if let Projection::Orthographic { width, height, .. } = self {
            *width = extent.x;
            *height = extent.y;
        }
    }
}

/// Camera for viewing the map
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 10.0),
            target: DVec3::ZERO,
            up: DVec3::Y,
            projection: Projection::default(),
        }
    }
}

impl Camera {
    pub fn new(position: DVec3, target: DVec3, up: DVec3, projection: Projection) -> Self {
        Self {
            position,
            target,
            up,
            projection,
        }
    }

    pub fn look_at(&mut self, target: DVec3) {
        self.target = target;
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    /// Distance between eye and target
    pub fn distance(&self) -> f64 {
        (self.position - self.target).length()
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> DMat4 {
        self.projection.matrix()
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get the forward direction
    pub fn forward(&self) -> DVec3 {
        (self.target - self.position).normalize()
    }

    /// Camera local X and Y axes in world space (columns of the camera
    /// world matrix)
    pub fn basis(&self) -> (DVec3, DVec3) {
        let world = self.view_matrix().inverse();
        (world.x_axis.truncate(), world.y_axis.truncate())
    }

    /// Ray from the eye through a point in normalized device coordinates
    pub fn ray_through_ndc(&self, ndc: DVec2) -> Ray {
        let inverse = self.view_projection_matrix().inverse();
        // glam's right-handed projections map depth to [0, 1]
        let near = inverse.project_point3(DVec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(DVec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }

    /// Build camera uniform data for shaders
    pub fn uniform_data(&self) -> CameraUniformData {
        let view = self.view_matrix().as_mat4();
        let proj = self.projection_matrix().as_mat4();
        let view_proj = proj * view;

        CameraUniformData {
            view,
            proj,
            view_proj,
            position: self.position.as_vec3().extend(1.0),
            near_far: Vec4::new(
                self.projection.near() as f32,
                self.projection.far() as f32,
                0.0,
                0.0,
            ),
        }
    }

    /// Update aspect ratio for perspective projection
    pub fn set_aspect(&mut self, width: f64, height: f64) {
        self.projection.set_aspect(width / height.max(1.0));
    }
}

/// Camera uniform data for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniformData {
    pub view: Mat4,
    pub proj: Mat4,
    pub view_proj: Mat4,
    pub position: Vec4,
    pub near_far: Vec4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_of_default_camera() {
        let camera = Camera::default();
        let (x, y) = camera.basis();
        assert!((x - DVec3::X).length() < 1e-12);
        assert!((y - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn center_ray_points_at_target() {
        let camera = Camera::default();
        let ray = camera.ray_through_ndc(DVec2::ZERO);
        let dir = ray.dir.normalize();
        assert!((dir - DVec3::NEG_Z).length() < 1e-9);
    }

    #[test]
    fn orthographic_ray_is_parallel_to_view() {
        let camera = Camera::new(
            DVec3::new(2.0, 3.0, 10.0),
            DVec3::new(2.0, 3.0, 0.0),
            DVec3::Y,
            Projection::orthographic(20.0, 10.0, 0.1, 100.0),
        );
        let ray = camera.ray_through_ndc(DVec2::new(1.0, 1.0));
        assert!((ray.dir.normalize() - DVec3::NEG_Z).length() < 1e-9);
        assert!((ray.origin.x - 12.0).abs() < 1e-9);
        assert!((ray.origin.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn uniform_data_is_pod() {
        let data = Camera::default().uniform_data();
        assert_eq!(bytemuck::bytes_of(&data).len(), std::mem::size_of::<CameraUniformData>());
        assert_eq!(data.position, Vec4::new(0.0, 0.0, 10.0, 1.0));
    }
}
