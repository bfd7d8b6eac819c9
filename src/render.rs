//! Rendering backend seam
//!
//! The rasterizer lives outside this crate. Each frame it receives the
//! camera uniforms (GPU layout) and the object set; it may also provide its
//! own ray casting through [`Raycast`].

use crate::scene::{CameraUniformData, ObjectSet};

pub use crate::scene::{PickHit, Ray, Raycast, SphereRaycaster};

/// Data handed to the backend for one frame
pub struct Frame<'a> {
    pub camera: CameraUniformData,
    pub objects: &'a ObjectSet,
    /// Indices into `objects`, drawn first to last
    pub drawing_order: &'a [usize],
    /// Object set generation; a change means markers must be rebuilt
    pub generation: u64,
}

/// Rasterizer attached to a widget
pub trait RenderBackend {
    fn draw_frame(&mut self, frame: &Frame<'_>);

    /// Ray casting used for hover picking
    fn raycaster(&self) -> Box<dyn Raycast> {
        Box::new(SphereRaycaster)
    }
}

/// Backend that only records what it was asked to draw
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    pub frames: usize,
    pub last_camera: Option<CameraUniformData>,
    pub last_generation: Option<u64>,
    pub last_object_count: usize,
}

impl RenderBackend for HeadlessBackend {
    fn draw_frame(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        self.last_camera = Some(frame.camera);
        self.last_generation = Some(frame.generation);
        self.last_object_count = frame.objects.len();
    }
}
