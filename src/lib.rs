//! Antigenic map viewer - manipulator core
//!
//! Input handling and camera control for interactive 2D and 3D antigenic map
//! viewers. Rasterization is left to an attached [`RenderBackend`].
//!
//! # Features
//! - Gesture dispatcher turning raw pointer / wheel / key input into named,
//!   modifier-qualified gestures (`drag:shift:amv`)
//! - Controls for pan, orbit, rotate, zoom, scale, flip, field of view and
//!   reset, bound to gestures
//! - Hover picking by ray casting with change-only notification
//! - JSON view snapshots that restore camera pose and object layout
//! - Web support via WebAssembly

pub mod config;
pub mod controls;
pub mod error;
pub mod gesture;
pub mod math;
pub mod plot_data;
pub mod ready;
pub mod render;
pub mod scene;
pub mod snapshot;
pub mod viewer;
pub mod widget;

// Web-specific modules
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::ManipulatorConfig;
pub use controls::{bind_control, Control, ControlKind, HoverPicker};
pub use error::{ViewerError, ViewerResult};
pub use gesture::{GestureDispatcher, GesturePayload, ModifierKeys, RawInput};
pub use plot_data::PlotData;
pub use ready::Readiness;
pub use render::{Frame, RenderBackend};
pub use scene::{MapObject, ObjectSet};
pub use snapshot::ViewerStateSnapshot;
pub use viewer::{Dimensionality, Viewer};
pub use widget::MapWidget;

// Native initialization helper
#[cfg(not(target_arch = "wasm32"))]
pub fn init_native_logging() {
    // A second init (e.g. from several tests) keeps the first logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

// Web initialization helper
#[cfg(target_arch = "wasm32")]
pub fn init_web_logging() {
    // Set up panic hook for better error messages in console
    console_error_panic_hook::set_once();
    // Set up console logging for web
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
}
