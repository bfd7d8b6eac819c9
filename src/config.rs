//! Manipulator configuration
//!
//! Every tuning constant used by the controls lives here instead of in shared
//! statics, so two widgets on the same page can be tuned independently.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::ViewerResult;

/// Key code of `r` as reported by a `keypress` event
pub const KEY_R: u32 = 114;
/// Key code of `h` as reported by a `keypress` event
pub const KEY_H: u32 = 104;
/// Key code of `v` as reported by a `keypress` event
pub const KEY_V: u32 = 118;

/// Configuration for the manipulators of one viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulatorConfig {
    /// Namespace appended to gesture specs that don't name one
    pub namespace: String,
    /// Multiplier applied to the wheel Y delta before it reaches a control
    pub wheel_sensitivity: f64,
    /// Zoom-in ratio; zooming out uses the reciprocal
    pub zoom_ratio: f64,
    /// Object scale ratio; shrinking uses this, growing the reciprocal
    pub scale_ratio: f64,
    /// Field-of-view ratio per wheel step
    pub fov_ratio: f64,
    /// Smallest field of view in degrees the projection accepts
    pub fov_min: f64,
    /// Largest field of view in degrees the projection accepts
    pub fov_max: f64,
    /// Orbit speed, 1.0 = one full turn per canvas width of drag
    pub rotate_speed: f64,
    /// 2D viewport rotation in radians per unit of (scaled) wheel delta
    pub rotate_2d_speed: f64,
    /// Distance kept between the polar angle and the poles
    pub pole_epsilon: f64,
    /// Key code that resets the view
    pub reset_key_code: u32,
    /// Key code that mirrors the map horizontally (2D)
    pub flip_horizontal_key: u32,
    /// Key code that mirrors the map vertically (2D)
    pub flip_vertical_key: u32,
    /// Initial 3D field of view in degrees
    pub initial_fov: f64,
    /// Initial 3D camera position
    pub initial_camera_position: DVec3,
    /// Initial 3D look-at target
    pub initial_look_at: DVec3,
    /// Nominal world up used by the orbit math and the cameras
    pub world_up: DVec3,
}

impl Default for ManipulatorConfig {
    fn default() -> Self {
        Self {
            namespace: "amv".to_string(),
            wheel_sensitivity: 1.0 / 100.0,
            zoom_ratio: 0.95,
            scale_ratio: 0.95,
            fov_ratio: 0.95,
            fov_min: 1.0,
            fov_max: 179.0,
            rotate_speed: 1.0,
            rotate_2d_speed: 0.05,
            pole_epsilon: 1e-6,
            reset_key_code: KEY_R,
            flip_horizontal_key: KEY_H,
            flip_vertical_key: KEY_V,
            initial_fov: 75.0,
            initial_camera_position: DVec3::new(0.0, 0.0, 10.0),
            initial_look_at: DVec3::ZERO,
            world_up: DVec3::Y,
        }
    }
}

impl ManipulatorConfig {
    /// Parse a configuration from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> ViewerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Ratio for a wheel-driven operation: `ratio` when `delta_y > 0`, the
    /// reciprocal when `delta_y < 0`, and 1.0 when there is no delta.
    pub fn wheel_ratio(ratio: f64, delta_y: f64) -> f64 {
        if delta_y > 0.0 {
            ratio
        } else if delta_y < 0.0 {
            1.0 / ratio
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ManipulatorConfig::from_json(r#"{"zoom_ratio": 0.9}"#).unwrap();
        assert_eq!(config.zoom_ratio, 0.9);
        assert_eq!(config.namespace, "amv");
        assert_eq!(config.reset_key_code, KEY_R);
    }

    #[test]
    fn wheel_ratio_follows_sign() {
        assert_eq!(ManipulatorConfig::wheel_ratio(0.95, 3.0), 0.95);
        assert_eq!(ManipulatorConfig::wheel_ratio(0.95, -3.0), 1.0 / 0.95);
        assert_eq!(ManipulatorConfig::wheel_ratio(0.95, 0.0), 1.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ManipulatorConfig::from_json("{").is_err());
    }
}
