//! Error types for neuroscope-rs.

use thiserror::Error;

use crate::visual::ObjectId;

/// The main error type for viewer operations.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A public entry point received a value it cannot use.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested camera view preset does not exist.
    #[error("unknown view '{0}' - expected one of XY, XZ, YZ, -XY, -XZ, -YZ")]
    UnknownView(String),

    /// A colour specification could not be resolved.
    #[error("unable to use color '{0}'")]
    InvalidColor(String),

    /// A named colour map or palette is not registered.
    #[error("color map '{0}' not found")]
    UnknownColorMap(String),

    /// An add operation resolved to zero visuals.
    #[error("no visuals generated")]
    NoVisualsGenerated,

    /// A non-cursor visual was added without an entity id.
    #[error("visual {0} has no entity id")]
    MissingEntityId(ObjectId),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A label key collides with a bound shortcut.
    #[error("key '{0}' is already bound to a viewer shortcut")]
    KeyInUse(char),

    /// The cursor marker has not been placed yet.
    #[error("cursor not placed - control-click a neuron first")]
    CursorNotPlaced,

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;
