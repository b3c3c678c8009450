//! Rendering backend for neuroscope-rs.
//!
//! This crate provides the rendering seam used by the viewer, including:
//! - Arcball camera, named views and projection to canvas pixels
//! - The [`Canvas`] trait and a CPU [`SoftwareCanvas`]
//! - Pick buffer decoding and the concentric ring scan
//! - Color maps and palettes
//! - Screenshot encoding

pub mod camera;
pub mod canvas;
pub mod color_maps;
pub mod error;
pub mod pick;
pub mod screenshot;

pub use camera::{Camera, CameraState};
pub use canvas::{Canvas, FrameScene, IdentityScene, Shape, SoftwareCanvas};
pub use color_maps::{hls_palette, ColorMap, ColorMapRegistry};
pub use error::{RenderError, RenderResult};
pub use pick::{color_to_index, index_to_color, ring_order, CropRect, PickBuffer};
pub use screenshot::{save_image, ScreenshotError, ScreenshotOptions};
