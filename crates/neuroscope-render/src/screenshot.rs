//! Screenshot functionality for capturing rendered frames.

use image::RgbaImage;
use std::path::Path;

/// Options for taking screenshots.
#[derive(Debug, Clone)]
pub struct ScreenshotOptions {
    /// Factor by which the canvas size is scaled for the output image.
    pub pixel_scale: u32,
    /// Whether to use transparent background (PNG only).
    pub transparent_background: bool,
    /// Whether to hide the overlay while capturing.
    pub hide_overlay: bool,
}

impl Default for ScreenshotOptions {
    fn default() -> Self {
        Self {
            pixel_scale: 2,
            transparent_background: true,
            hide_overlay: true,
        }
    }
}

/// Saves an RGBA image to a file.
///
/// # Arguments
/// * `filename` - Output path (supports .png, .jpg, .jpeg)
/// * `img` - Rendered frame, top-left origin
///
/// # Errors
/// Returns an error if the file cannot be written or format is unsupported.
pub fn save_image(filename: impl AsRef<Path>, img: &RgbaImage) -> Result<(), ScreenshotError> {
    let path = filename.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => {
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            // Convert to RGB for JPEG (no alpha)
            let rgb_img = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(ScreenshotError::UnsupportedFormat(extension));
        }
    }

    log::info!("saved {}x{} screenshot to {}", img.width(), img.height(), path.display());
    Ok(())
}

/// Error type for screenshot operations.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Render(#[from] crate::error::RenderError),
}

impl From<ScreenshotError> for neuroscope_core::ViewerError {
    fn from(err: ScreenshotError) -> Self {
        match err {
            ScreenshotError::IoError(e) => neuroscope_core::ViewerError::Io(e),
            ScreenshotError::UnsupportedFormat(ext) => {
                neuroscope_core::ViewerError::InvalidInput(format!("unsupported image format '{ext}'"))
            }
            other => neuroscope_core::ViewerError::RenderError(other.to_string()),
        }
    }
}
