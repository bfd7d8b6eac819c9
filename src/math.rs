//! Camera manipulation math
//!
//! Pure functions turning a gesture delta plus the current pose into a new
//! pose. The orbit math works in a frame where the camera's up vector is the
//! nominal world up, so it is independent of which axis the caller treats as
//! up.

use std::f64::consts::{PI, TAU};

use glam::{DQuat, DVec2, DVec3};

/// Spherical coordinates of an offset from the look-at target.
///
/// `theta` is the azimuth measured from +Z around +Y, `phi` the polar angle
/// measured from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f64,
    pub theta: f64,
    pub phi: f64,
}

impl Spherical {
    pub fn new(radius: f64, theta: f64, phi: f64) -> Self {
        Self { radius, theta, phi }
    }

    pub fn from_offset(offset: DVec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: horizontal.atan2(offset.y),
        }
    }

    pub fn to_offset(&self) -> DVec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        DVec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep `phi` inside `[epsilon, PI - epsilon]`
    pub fn clamp_phi(&mut self, epsilon: f64) {
        self.phi = self.phi.clamp(epsilon, PI - epsilon);
    }
}

/// Accumulated change applied by one orbit update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitDelta {
    pub theta: f64,
    pub phi: f64,
    /// Radius multiplier
    pub scale: f64,
    /// World-space translation of both eye and target
    pub pan: DVec3,
}

impl Default for OrbitDelta {
    fn default() -> Self {
        Self {
            theta: 0.0,
            phi: 0.0,
            scale: 1.0,
            pan: DVec3::ZERO,
        }
    }
}

impl OrbitDelta {
    pub fn rotate(theta: f64, phi: f64) -> Self {
        Self {
            theta,
            phi,
            ..Self::default()
        }
    }

    pub fn dolly(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    pub fn pan(offset: DVec3) -> Self {
        Self {
            pan: offset,
            ..Self::default()
        }
    }
}

/// New eye and target after an orbit update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPose {
    pub position: DVec3,
    pub target: DVec3,
    /// Spherical coordinates after clamping, in the up-aligned frame
    pub spherical: Spherical,
}

/// Revolve `position` around `target`.
///
/// `up` is the camera's current up vector and `world_up` the nominal up the
/// spherical coordinates are defined against.
pub fn orbit(
    position: DVec3,
    target: DVec3,
    up: DVec3,
    world_up: DVec3,
    delta: OrbitDelta,
    pole_epsilon: f64,
) -> OrbitPose {
    let to_world_up = DQuat::from_rotation_arc(up.normalize(), world_up.normalize());
    let from_world_up = to_world_up.inverse();

    let mut spherical = Spherical::from_offset(to_world_up * (position - target));
    spherical.theta += delta.theta;
    spherical.phi += delta.phi;
    spherical.clamp_phi(pole_epsilon);
    spherical.radius *= delta.scale;

    let target = target + delta.pan;
    let position = target + from_world_up * spherical.to_offset();
    OrbitPose {
        position,
        target,
        spherical,
    }
}

/// Azimuth / polar change for a drag of `delta` pixels
pub fn orbit_angles(delta: DVec2, canvas_size: DVec2, rotate_speed: f64) -> (f64, f64) {
    let canvas = canvas_size.max(DVec2::ONE);
    (
        -TAU * delta.x / canvas.x * rotate_speed,
        -TAU * delta.y / canvas.y * rotate_speed,
    )
}

/// World units per pixel at the target plane of a perspective camera
pub fn perspective_units_per_pixel(fov_degrees: f64, distance: f64, canvas_height: f64) -> f64 {
    2.0 * (fov_degrees / 2.0 * PI / 180.0).tan() * distance / canvas_height.max(1.0)
}

/// Target-plane offset for a pixel drag, from the camera's local X / Y axes
pub fn perspective_pan_offset(
    delta: DVec2,
    units_per_pixel: f64,
    camera_x: DVec3,
    camera_y: DVec3,
) -> DVec3 {
    camera_x * (-delta.x * units_per_pixel) + camera_y * (delta.y * units_per_pixel)
}

/// Viewport center offset for a pixel drag in a (possibly rotated) 2D view.
///
/// Screen right maps to world negative X so the map follows the pointer.
pub fn viewport_pan_offset(
    delta: DVec2,
    viewport_size: DVec2,
    canvas_size: DVec2,
    rotation: f64,
) -> DVec2 {
    let units_per_pixel = viewport_size / canvas_size.max(DVec2::ONE);
    let local = DVec2::new(-delta.x * units_per_pixel.x, delta.y * units_per_pixel.y);
    DVec2::from_angle(rotation).rotate(local)
}

/// Normalized device coordinates of a canvas pixel
pub fn pixel_to_ndc(position: DVec2, canvas_size: DVec2) -> DVec2 {
    let canvas = canvas_size.max(DVec2::ONE);
    DVec2::new(
        2.0 * position.x / canvas.x - 1.0,
        1.0 - 2.0 * position.y / canvas.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn spherical_round_trip() {
        let offset = DVec3::new(1.0, 2.0, -3.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).length() < 1e-12);
    }

    #[test]
    fn orbit_keeps_radius() {
        let pose = orbit(
            DVec3::new(0.0, 0.0, 10.0),
            DVec3::ZERO,
            DVec3::Y,
            DVec3::Y,
            OrbitDelta::rotate(0.7, -0.3),
            EPS,
        );
        assert!((pose.position.length() - 10.0).abs() < 1e-9);
        assert!((pose.spherical.theta - 0.7).abs() < 1e-12);
    }

    #[test]
    fn polar_angle_pinned_at_poles() {
        let mut position = DVec3::new(0.0, 0.0, 10.0);
        for _ in 0..12 {
            let pose = orbit(
                position,
                DVec3::ZERO,
                DVec3::Y,
                DVec3::Y,
                OrbitDelta::rotate(0.0, -4.0),
                EPS,
            );
            assert!(!pose.spherical.phi.is_nan());
            assert!(pose.position.is_finite());
            assert_eq!(pose.spherical.phi, EPS);
            position = pose.position;
        }
        for _ in 0..12 {
            let pose = orbit(
                position,
                DVec3::ZERO,
                DVec3::Y,
                DVec3::Y,
                OrbitDelta::rotate(0.0, 4.0),
                EPS,
            );
            assert!(!pose.spherical.phi.is_nan());
            assert_eq!(pose.spherical.phi, PI - EPS);
            position = pose.position;
        }
    }

    #[test]
    fn orbit_respects_camera_up() {
        // With Z as up, a pure azimuth change must keep the height along Z.
        let pose = orbit(
            DVec3::new(10.0, 0.0, 3.0),
            DVec3::ZERO,
            DVec3::Z,
            DVec3::Y,
            OrbitDelta::rotate(1.0, 0.0),
            EPS,
        );
        assert!((pose.position.z - 3.0).abs() < 1e-9);
    }

    #[test]
    fn dolly_and_pan() {
        let pose = orbit(
            DVec3::new(0.0, 0.0, 10.0),
            DVec3::ZERO,
            DVec3::Y,
            DVec3::Y,
            OrbitDelta {
                scale: 0.5,
                pan: DVec3::new(1.0, 0.0, 0.0),
                ..OrbitDelta::default()
            },
            EPS,
        );
        assert!((pose.position - DVec3::new(1.0, 0.0, 5.0)).length() < 1e-9);
        assert_eq!(pose.target, DVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn drag_angles() {
        let (theta, phi) = orbit_angles(DVec2::new(100.0, 50.0), DVec2::new(400.0, 200.0), 1.0);
        assert!((theta + TAU / 4.0).abs() < 1e-12);
        assert!((phi + TAU / 4.0).abs() < 1e-12);
    }

    #[test]
    fn units_per_pixel_at_90_degrees() {
        let upp = perspective_units_per_pixel(90.0, 10.0, 200.0);
        assert!((upp - 0.1).abs() < 1e-12);
    }

    #[test]
    fn viewport_pan_flips_x() {
        let offset = viewport_pan_offset(
            DVec2::new(10.0, 10.0),
            DVec2::new(20.0, 20.0),
            DVec2::new(200.0, 200.0),
            0.0,
        );
        assert!((offset - DVec2::new(-1.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn ndc_corners() {
        let canvas = DVec2::new(800.0, 600.0);
        assert_eq!(pixel_to_ndc(DVec2::ZERO, canvas), DVec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_ndc(canvas, canvas), DVec2::new(1.0, -1.0));
        assert_eq!(pixel_to_ndc(canvas / 2.0, canvas), DVec2::ZERO);
    }
}
