//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The requested target has a zero dimension.
    #[error("cannot render a {width}x{height} target")]
    EmptyTarget { width: u32, height: u32 },

    /// The identity pass has more targets than the pick encoding can hold.
    #[error("too many pick targets: {0}")]
    TooManyTargets(usize),

    /// A pixel buffer does not match its declared dimensions.
    #[error("buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Raw readback bytes could not be reinterpreted as pixels.
    #[error("readback failed: {0}")]
    Readback(String),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for neuroscope_core::ViewerError {
    fn from(err: RenderError) -> Self {
        neuroscope_core::ViewerError::RenderError(err.to_string())
    }
}
