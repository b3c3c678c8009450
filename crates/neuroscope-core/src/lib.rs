//! Core abstractions for neuroscope-rs.
//!
//! This crate provides the scene state behind the interactive viewer:
//! - [`Visual`] records tagged with entity id and part
//! - the [`Registry`] of attached visuals and its entity grouping
//! - [`SelectionState`], the [`Legend`], the [`Overlay`] and cycling
//! - scoped event and interactivity guards
//! - configuration options and the collaborator traits

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod collaborators;
pub mod color;
pub mod cycle;
pub mod error;
pub mod events;
pub mod legend;
pub mod options;
pub mod overlay;
pub mod pick;
pub mod registry;
pub mod selection;
pub mod view;
pub mod visual;

pub use collaborators::{
    ColormapResolver, CoordinateLookup, EntityResolver, QueryStringLookup, UrlOpener,
};
pub use color::{parse_color, ColorSpec};
pub use cycle::{CycleCursor, DimMode};
pub use error::{Result, ViewerError};
pub use events::{EventBlock, EventGate, Interactivity, InteractivitySuspension};
pub use legend::{Legend, LegendDiff, LegendLabel};
pub use options::{KeyAction, Keymap, ViewerOptions};
pub use overlay::{FpsCounter, Overlay, OverlayLine, Rims, ScreenRect};
pub use pick::{PickIndex, PickTarget};
pub use registry::{Registry, Selector};
pub use selection::{SelectionChange, SelectionState};
pub use view::ViewPreset;
pub use visual::{ConnectorKind, EntityId, Geometry, ObjectId, Part, Visual};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
