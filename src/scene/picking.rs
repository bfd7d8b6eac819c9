//! Ray casting against the object set

use glam::DVec3;

use super::ObjectSet;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub dir: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, dir: DVec3) -> Self {
        Self { origin, dir }
    }
}

/// One intersected object
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub index: usize,
    /// Distance from the ray origin along the normalized direction
    pub distance: f64,
}

/// Ray casting capability of a render backend
pub trait Raycast {
    /// Intersected objects, nearest first
    fn raycast(&self, ray: &Ray, objects: &ObjectSet) -> Vec<PickHit>;
}

/// Exhaustive ray / sphere test over every object.
///
/// Each object is a sphere of radius `size * scale / 2` around its position.
/// Ties in distance are broken by the lower index.
#[derive(Debug, Default, Clone, Copy)]
pub struct SphereRaycaster;

impl Raycast for SphereRaycaster {
    fn raycast(&self, ray: &Ray, objects: &ObjectSet) -> Vec<PickHit> {
        let Some(dir) = ray.dir.try_normalize() else {
            return Vec::new();
        };

        let mut hits: Vec<PickHit> = objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| {
                let radius = objects.marker_radius(object);
                intersect_sphere(ray.origin, dir, object.position, radius)
                    .map(|distance| PickHit { index, distance })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
        hits
    }
}

/// Distance along the unit direction `dir` to the first intersection with the
/// sphere, or `None`. A ray starting inside the sphere hits at distance 0.
pub fn intersect_sphere(origin: DVec3, dir: DVec3, center: DVec3, radius: f64) -> Option<f64> {
    if radius <= 0.0 {
        return None;
    }
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 || b > 0.0 {
        return None;
    }
    Some(-b - discriminant.sqrt())
}
