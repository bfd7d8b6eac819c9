//! Layout transform

use glam::{DMat2, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Linear 2D transform applied to the x/y part of map positions.
///
/// Plot data may carry one (rotation / reflection of the layout). The flip
/// control mirrors objects around the set center with the `FLIP_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutTransform {
    matrix: DMat2,
}

impl Default for LayoutTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl LayoutTransform {
    pub const IDENTITY: Self = Self {
        matrix: DMat2::IDENTITY,
    };

    /// Mirror across the vertical axis (x -> -x)
    pub const FLIP_HORIZONTAL: Self = Self {
        matrix: DMat2::from_cols(DVec2::new(-1.0, 0.0), DVec2::new(0.0, 1.0)),
    };

    /// Mirror across the horizontal axis (y -> -y)
    pub const FLIP_VERTICAL: Self = Self {
        matrix: DMat2::from_cols(DVec2::new(1.0, 0.0), DVec2::new(0.0, -1.0)),
    };

    /// Create from row-major `[[a, b], [c, d]]`
    pub fn from_rows(rows: [[f64; 2]; 2]) -> Self {
        Self {
            matrix: DMat2::from_cols(
                DVec2::new(rows[0][0], rows[1][0]),
                DVec2::new(rows[0][1], rows[1][1]),
            ),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == DMat2::IDENTITY
    }

    pub fn apply2(&self, point: DVec2) -> DVec2 {
        self.matrix * point
    }

    /// Transform x/y of a position, z is kept
    pub fn apply(&self, point: DVec3) -> DVec3 {
        self.apply2(point.truncate()).extend(point.z)
    }

    /// Transform `point` around `origin`
    pub fn apply_around(&self, point: DVec3, origin: DVec3) -> DVec3 {
        self.apply(point - origin) + origin
    }
}
