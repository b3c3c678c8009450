//! Seams to the systems the viewer depends on but does not implement.
//!
//! Fetching morphologies, building geometry, computing colour maps and
//! building lookup URLs all live outside the viewer. The viewer only calls
//! these traits.

use std::fmt::Write as _;

use glam::{Vec3, Vec4};

use crate::color::ColorSpec;
use crate::error::Result;
use crate::visual::{EntityId, Visual};

/// Turns entity identifiers into ready-to-render visuals.
pub trait EntityResolver {
    /// Returns the visuals for the given entities, each tagged with its
    /// entity id and part.
    fn resolve_entities(&self, ids: &[EntityId]) -> Result<Vec<Visual>>;
}

/// Resolves a colour specification for a batch of entities.
pub trait ColormapResolver {
    /// Returns exactly `count` colours.
    fn resolve_colormap(&self, spec: &ColorSpec, count: usize) -> Result<Vec<Vec4>>;
}

/// Builds an external URL pointing at a 3D location.
pub trait CoordinateLookup {
    fn coordinate_to_url(
        &self,
        position: Vec3,
        precision: u32,
        active_entity: Option<&EntityId>,
    ) -> String;
}

/// Opens a URL outside the viewer, e.g. in the system browser.
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Lookup that formats the position as a query string on a base URL.
#[derive(Debug, Clone)]
pub struct QueryStringLookup {
    pub base_url: String,
}

impl QueryStringLookup {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl CoordinateLookup for QueryStringLookup {
    fn coordinate_to_url(
        &self,
        position: Vec3,
        precision: u32,
        active_entity: Option<&EntityId>,
    ) -> String {
        let mut url = format!(
            "{}?xp={}&yp={}&zp={}&tool=tracingtool&zoom=0&sid0={precision}",
            self.base_url, position.x, position.y, position.z
        );
        if let Some(entity) = active_entity {
            let _ = write!(url, "&active_skeleton_id={entity}");
        }
        url
    }
}
