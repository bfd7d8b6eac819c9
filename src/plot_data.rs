//! Plot data input
//!
//! Only the parts of a plot the viewer needs are decoded: positions, the
//! per-point style, drawing order and the viewport / transformation hints.
//! Unknown style fields (labels, aspect, rotation, ...) are ignored.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{ViewerError, ViewerResult};
use crate::scene::{LayoutTransform, MapObject, ObjectSet, Shape};
use crate::viewer::{Dimensionality, Viewport2d};

/// Marker style entry of the style table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub shape: Shape,
    pub size: f64,
    pub fill: String,
    pub outline: String,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            shape: Shape::Circle,
            size: 1.0,
            fill: "transparent".to_string(),
            outline: "black".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    /// Point coordinates; an empty entry marks a point without position
    pub layout: Vec<Vec<f64>>,
    #[serde(default)]
    pub style_index: Vec<usize>,
    #[serde(default)]
    pub styles: Vec<PlotStyle>,
    /// Layers of point indices, drawn first to last
    #[serde(default)]
    pub drawing_order: Option<Vec<Vec<usize>>>,
    #[serde(default)]
    pub viewport_origin: Option<[f64; 2]>,
    #[serde(default)]
    pub viewport_size: Option<[f64; 2]>,
    /// Row-major 2x2 matrix applied to 2D layouts
    #[serde(default)]
    pub transformation: Option<[[f64; 2]; 2]>,
}

impl PlotData {
    pub fn from_json(json: &str) -> ViewerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Dimensionality from the widest coordinate entry. A layout with no
    /// positioned point is treated as 2D.
    pub fn dimensionality(&self) -> ViewerResult<Dimensionality> {
        match self.layout.iter().map(Vec::len).max().unwrap_or(0) {
            0 => Ok(Dimensionality::Two),
            count => Dimensionality::try_from(count),
        }
    }

    pub fn transformation(&self) -> LayoutTransform {
        self.transformation
            .map(LayoutTransform::from_rows)
            .unwrap_or_default()
    }

    /// Viewport hint, when both origin and size are present
    pub fn viewport(&self) -> Option<Viewport2d> {
        match (self.viewport_origin, self.viewport_size) {
            (Some(origin), Some(size)) => Some(Viewport2d::from_origin(
                DVec2::from_array(origin),
                DVec2::from_array(size),
            )),
            _ => None,
        }
    }

    /// Object set indices in drawing order; defaults to layout order.
    /// Points without coordinates and indices out of range are dropped.
    pub fn drawing_order(&self) -> Vec<usize> {
        let mut next = 0;
        let object_index: Vec<Option<usize>> = self
            .layout
            .iter()
            .map(|coordinates| {
                if coordinates.is_empty() {
                    return None;
                }
                next += 1;
                Some(next - 1)
            })
            .collect();
        match &self.drawing_order {
            Some(layers) => layers
                .iter()
                .flatten()
                .filter_map(|point| object_index.get(*point).copied().flatten())
                .collect(),
            None => object_index.into_iter().flatten().collect(),
        }
    }

    fn style(&self, point: usize) -> PlotStyle {
        self.style_index
            .get(point)
            .and_then(|index| self.styles.get(*index))
            .cloned()
            .unwrap_or_default()
    }
}

impl ObjectSet {
    /// Build the object set of a plot. Points without coordinates are
    /// skipped; the plot transformation is applied to 2D layouts.
    pub fn from_plot_data(plot: &PlotData) -> ViewerResult<Self> {
        let dimensionality = plot.dimensionality()?;
        let transform = plot.transformation();
        let mut objects = Vec::with_capacity(plot.layout.len());

        for (point, coordinates) in plot.layout.iter().enumerate() {
            let position = match coordinates.as_slice() {
                [] => continue,
                [x, y] => DVec3::new(*x, *y, 0.0),
                [x, y, z] => DVec3::new(*x, *y, *z),
                other => {
                    return Err(ViewerError::ConfigurationError {
                        dimensionality: other.len(),
                    })
                }
            };
            let position = match dimensionality {
                Dimensionality::Two if !transform.is_identity() => transform.apply(position),
                _ => position,
            };
            let style = plot.style(point);
            objects.push(MapObject {
                position,
                style_index: plot.style_index.get(point).copied().unwrap_or_default(),
                shape: style.shape,
                size: style.size,
                fill: style.fill,
                outline: style.outline,
            });
        }

        log::debug!(
            "Loaded {} of {} points as a {dimensionality} map",
            objects.len(),
            plot.layout.len()
        );
        Ok(ObjectSet::new(objects))
    }
}
