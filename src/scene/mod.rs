//! Scene state shared by the viewers: camera, map objects, ray casting

mod camera;
mod objects;
mod picking;
mod transform;

pub use camera::*;
pub use objects::*;
pub use picking::*;
pub use transform::*;
