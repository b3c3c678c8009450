//! neuroscope-rs: an interactive 3D viewer for neuron morphologies.
//!
//! The viewer keeps a registry of renderable visuals tagged with the entity
//! (neuron) they belong to, and lets the user select, hide, recolour and
//! inspect them by clicking and typing.
//!
//! # Quick Start
//!
//! ```no_run
//! use neuroscope_rs::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let viewer = new_viewer(Viewer::headless(800, 600));
//!     let neurite = Visual::new(
//!         Part::Body,
//!         Geometry::polyline(vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)]),
//!     )
//!     .with_entity("16")
//!     .with_name("PN glomerulus DA1");
//!     viewer.borrow_mut().add(vec![neurite], &AddOptions::default())?;
//!
//!     viewer.borrow_mut().select([EntityId::from("16")]);
//!     viewer.borrow_mut().set_view("XZ")?;
//!     viewer.borrow_mut().screenshot("neuron.png", &ScreenshotOptions::default())?;
//!
//!     close(viewer);
//!     Ok(())
//! }
//! ```
//!
//! # Interaction
//!
//! A windowed host forwards key and mouse presses to
//! [`Viewer::on_key_press`] and [`Viewer::on_mouse_press`]. `winit`
//! modifier and button types convert into [`Modifiers`] and
//! [`MouseButton`].

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

mod browser;
mod opener;
mod viewer;

use std::cell::RefCell;
use std::rc::Rc;

pub use browser::Browser;
pub use opener::{LogOpener, WebbrowserOpener};
pub use viewer::{
    AddOptions, AlphaSpec, KeyPress, Modifiers, MouseButton, MousePress, PressOutcome, Viewer,
    DEFAULT_LOOKUP_URL,
};

// Re-export core types
pub use neuroscope_core::{
    ColorSpec, ColormapResolver, ConnectorKind, CoordinateLookup, DimMode, EntityId,
    EntityResolver, Geometry, KeyAction, Keymap, Legend, LegendLabel, ObjectId, Overlay,
    OverlayLine, Part, PickTarget, QueryStringLookup, Registry, Result, Rims, Selector,
    SelectionChange, UrlOpener, ViewPreset, ViewerError, ViewerOptions, Visual,
};
pub use neuroscope_core::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export render types
pub use neuroscope_render::{
    Camera, CameraState, Canvas, ColorMap, ColorMapRegistry, ScreenshotOptions, SoftwareCanvas,
};

/// Shared handle to a viewer, passed explicitly to the convenience functions.
pub type ViewerHandle = Rc<RefCell<Viewer>>;

/// Initialises `env_logger` once. Later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Wraps a viewer in a handle.
pub fn new_viewer(viewer: Viewer) -> ViewerHandle {
    Rc::new(RefCell::new(viewer))
}

/// Returns the given viewer, or creates one with `make` if there is none.
pub fn get_viewer(current: Option<&ViewerHandle>, make: impl FnOnce() -> Viewer) -> ViewerHandle {
    match current {
        Some(handle) => Rc::clone(handle),
        None => {
            log::debug!("no viewer given, creating one");
            new_viewer(make())
        }
    }
}

/// Detaches every visual from the viewer.
pub fn clear(viewer: &ViewerHandle) {
    viewer.borrow_mut().clear();
}

/// Closes the viewer and releases this handle.
pub fn close(viewer: ViewerHandle) {
    viewer.borrow_mut().close();
}
