//! The interactive viewer and its scene state.

mod appearance;
mod capture;
mod input;
mod labeling;
mod picking;
mod scene;
mod selection;

use std::collections::BTreeMap;

use glam::{UVec2, Vec3};
use neuroscope_core::{
    ColormapResolver, CoordinateLookup, CycleCursor, EntityId, EntityResolver, EventGate,
    FpsCounter, Interactivity, Legend, Overlay, QueryStringLookup, Registry, SelectionState,
    UrlOpener, ViewerOptions,
};
use neuroscope_render::{Camera, CameraState, Canvas, ColorMapRegistry, SoftwareCanvas};

use crate::opener::WebbrowserOpener;

pub use appearance::AlphaSpec;
pub use input::{KeyPress, Modifiers, MouseButton, MousePress, PressOutcome};
pub use scene::AddOptions;

/// Base URL used by the default coordinate lookup.
pub const DEFAULT_LOOKUP_URL: &str = "http://localhost:8000/";

/// An interactive 3D viewer.
///
/// Owns the registry of attached visuals together with every state derived
/// from it (selection, legend, overlay, cycling, labels) and the camera.
/// All mutation happens on the caller's thread.
pub struct Viewer {
    options: ViewerOptions,
    canvas: Box<dyn Canvas>,
    camera: Camera,
    default_camera: CameraState,

    registry: Registry,
    selection: SelectionState,
    legend: Legend,
    overlay: Overlay,
    fps: FpsCounter,

    cycle: CycleCursor,
    // Entities brought into focus by the last cycle step
    active: Vec<EntityId>,
    picking: bool,

    events: EventGate,
    interactivity: Interactivity,

    // Cursor marker
    cursor_position: Option<Vec3>,
    cursor_entity: Option<EntityId>,

    // Labeling mode
    label_mode: bool,
    label_keys: BTreeMap<char, String>,
    label_assignments: BTreeMap<EntityId, String>,

    entity_resolver: Option<Box<dyn EntityResolver>>,
    colormaps: Box<dyn ColormapResolver>,
    lookup: Box<dyn CoordinateLookup>,
    opener: Box<dyn UrlOpener>,
}

impl Viewer {
    /// Creates a viewer drawing into `canvas`.
    pub fn new(options: ViewerOptions, canvas: impl Canvas + 'static) -> Self {
        let size = canvas.size();
        let camera = Camera::new(aspect_ratio(size));
        let default_camera = camera.state();

        let mut overlay = Overlay::new(options.background_color);
        overlay.layout(size.as_vec2(), &options.rims);
        overlay.set_picking_help_visible(options.picking);

        let mut legend = Legend::new(options.legend_font_size, options.rims.left, options.rims.top);
        legend.set_visible(options.show_legend);

        log::info!("viewer created ({}x{})", size.x, size.y);

        Self {
            selection: SelectionState::new(options.highlight_color),
            picking: options.picking,
            canvas: Box::new(canvas),
            camera,
            default_camera,
            registry: Registry::new(),
            legend,
            overlay,
            fps: FpsCounter::default(),
            cycle: CycleCursor::new(),
            active: Vec::new(),
            events: EventGate::new(),
            interactivity: Interactivity::new(),
            cursor_position: None,
            cursor_entity: None,
            label_mode: false,
            label_keys: BTreeMap::new(),
            label_assignments: BTreeMap::new(),
            entity_resolver: None,
            colormaps: Box::new(ColorMapRegistry::new()),
            lookup: Box::new(QueryStringLookup::new(DEFAULT_LOOKUP_URL)),
            opener: Box::new(WebbrowserOpener),
            options,
        }
    }

    /// A viewer with default options on a [`SoftwareCanvas`].
    #[must_use]
    pub fn headless(width: u32, height: u32) -> Self {
        Self::new(ViewerOptions::default(), SoftwareCanvas::new(width, height))
    }

    /// Sets the collaborator used by [`Viewer::add_entities`].
    #[must_use]
    pub fn with_entity_resolver(mut self, resolver: impl EntityResolver + 'static) -> Self {
        self.entity_resolver = Some(Box::new(resolver));
        self
    }

    /// Replaces the colour map resolver used for add-time colouring,
    /// `set_colors` and `colorize`.
    #[must_use]
    pub fn with_colormaps(mut self, colormaps: impl ColormapResolver + 'static) -> Self {
        self.colormaps = Box::new(colormaps);
        self
    }

    #[must_use]
    pub fn with_lookup(mut self, lookup: impl CoordinateLookup + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self
    }

    #[must_use]
    pub fn with_opener(mut self, opener: impl UrlOpener + 'static) -> Self {
        self.opener = Box::new(opener);
        self
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access for navigation (orbit, pan, zoom).
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Camera state captured at construction.
    pub fn default_camera(&self) -> CameraState {
        self.default_camera
    }

    /// Logical canvas size in pixels.
    pub fn canvas_size(&self) -> UVec2 {
        self.canvas.size()
    }

    /// Shared handle to the canvas event gate.
    pub fn event_gate(&self) -> &EventGate {
        &self.events
    }

    pub fn interactivity(&self) -> &Interactivity {
        &self.interactivity
    }

    /// Entities in focus after the last cycle step.
    pub fn active_entities(&self) -> &[EntityId] {
        &self.active
    }

    /// World position of the cursor marker, if placed.
    pub fn cursor_position(&self) -> Option<Vec3> {
        self.cursor_position
    }

    /// Detaches everything and releases derived state.
    pub fn close(&mut self) {
        let _block = self.events.block();
        self.registry.clear();
        self.legend.clear();
        self.active.clear();
        self.cursor_position = None;
        self.cursor_entity = None;
        log::info!("viewer closed");
    }
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("visuals", &self.registry.len())
            .field("selected", &self.selection.selected())
            .field("picking", &self.picking)
            .field("canvas", &self.canvas.size())
            .finish_non_exhaustive()
    }
}

fn aspect_ratio(size: UVec2) -> f32 {
    if size.y == 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let aspect = size.x as f32 / size.y as f32;
    aspect
}
