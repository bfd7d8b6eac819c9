//! Error types for the manipulator core

use thiserror::Error;

/// Viewer error type
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Invalid gesture spec {spec:?}: {reason}")]
    InvalidGesture { spec: String, reason: String },
    #[error("Configuration error: unsupported number of dimensions {dimensionality}")]
    ConfigurationError { dimensionality: usize },
    #[error("Snapshot has {snapshot} dimensions but viewer has {viewer}")]
    DimensionalityMismatch { snapshot: usize, viewer: usize },
    #[error("Viewer is not ready")]
    NotReady,
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ViewerResult<T> = Result<T, ViewerError>;

impl ViewerError {
    pub(crate) fn invalid_gesture(spec: &str, reason: impl Into<String>) -> Self {
        ViewerError::InvalidGesture {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}
