//! Map points and the object set

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::LayoutTransform;

/// Marker shape of a map point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Circle,
    Box,
    Triangle,
    Egg,
    UglyEgg,
}

/// One renderable map point, with the minimal state needed to redraw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub position: DVec3,
    #[serde(default)]
    pub style_index: usize,
    #[serde(default)]
    pub shape: Shape,
    /// Marker size in world units at object scale 1.0
    pub size: f64,
    pub fill: String,
    pub outline: String,
}

impl MapObject {
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            style_index: 0,
            shape: Shape::Circle,
            size: 1.0,
            fill: "transparent".to_string(),
            outline: "black".to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_colors(mut self, fill: impl Into<String>, outline: impl Into<String>) -> Self {
        self.fill = fill.into();
        self.outline = outline.into();
        self
    }
}

/// Axis for [`ObjectSet::flip`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// Ordered set of map points with a set-wide marker scale.
///
/// `diameter` and `center` describe the bounding box of the layout and are
/// recomputed by [`objects_updated`](Self::objects_updated).
#[derive(Debug, Clone)]
pub struct ObjectSet {
    objects: Vec<MapObject>,
    scale: f64,
    diameter: f64,
    center: DVec3,
    generation: u64,
}

impl Default for ObjectSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ObjectSet {
    pub fn new(objects: Vec<MapObject>) -> Self {
        let mut set = Self {
            objects,
            scale: 1.0,
            diameter: 0.0,
            center: DVec3::ZERO,
            generation: 0,
        };
        set.recompute_bounds();
        set
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapObject> {
        self.objects.iter()
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn get(&self, index: usize) -> Option<&MapObject> {
        self.objects.get(index)
    }

    /// Replace every object; bounds are refreshed on the next
    /// [`objects_updated`](Self::objects_updated)
    pub fn set_objects(&mut self, objects: Vec<MapObject>) {
        self.objects = objects;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Multiply the marker scale of the whole set
    pub fn multiply_scale(&mut self, ratio: f64) {
        self.scale *= ratio;
    }

    /// Pick / render radius of `object` at the current scale
    pub fn marker_radius(&self, object: &MapObject) -> f64 {
        object.size * self.scale / 2.0
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Overwrite the derived bounds (used when restoring a snapshot)
    pub fn set_bounds(&mut self, diameter: f64, center: DVec3) {
        self.diameter = diameter;
        self.center = center;
    }

    /// Incremented on every [`objects_updated`](Self::objects_updated); the
    /// render loop rebuilds its meshes when it changes
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Recompute bounds and mark the set as changed
    pub fn objects_updated(&mut self) {
        self.recompute_bounds();
        self.generation += 1;
    }

    /// Mirror the layout in place around its center
    pub fn flip(&mut self, axis: FlipAxis) {
        let transform = match axis {
            FlipAxis::Horizontal => LayoutTransform::FLIP_HORIZONTAL,
            FlipAxis::Vertical => LayoutTransform::FLIP_VERTICAL,
        };
        self.transform_layout(&transform);
    }

    /// Apply a layout transform around the set center
    pub fn transform_layout(&mut self, transform: &LayoutTransform) {
        let center = self.center;
        for object in &mut self.objects {
            object.position = transform.apply_around(object.position, center);
        }
    }

    fn recompute_bounds(&mut self) {
        let mut positions = self.objects.iter().map(|o| o.position);
        let Some(first) = positions.next() else {
            self.diameter = 0.0;
            self.center = DVec3::ZERO;
            return;
        };
        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        self.center = (min + max) / 2.0;
        self.diameter = (max - min).length();
    }
}
