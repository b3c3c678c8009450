//! Tagged visuals and their identifiers.
//!
//! A [`Visual`] is a single renderable primitive (a skeleton's line set, a
//! soma mesh, a connector marker set) carrying all of its metadata from
//! creation: process-unique object id, owning entity, part classifier,
//! visibility and colour.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Next object id to hand out. Ids are never reused within a process.
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`Visual`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocates a fresh id.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Domain identifier of an entity, e.g. a skeleton ID.
///
/// Not unique across visuals: every part of a neuron shares its entity id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an entity id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Kind of synaptic connector a connector visual represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    Presynapse,
    Postsynapse,
    GapJunction,
    Other,
}

/// What part of an entity a visual renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    /// Neurites, or the whole body of a non-neuron object.
    Body,
    /// Cell body.
    Soma,
    /// Synaptic connectors of the given kind.
    Connector(ConnectorKind),
    /// The on-screen 3D cursor marker.
    Cursor,
    /// A text label.
    Label,
}

impl Part {
    /// Whether visuals of this part must carry an entity id.
    #[must_use]
    pub fn requires_entity(self) -> bool {
        !matches!(self, Part::Cursor)
    }

    /// Whether this is a connector part of any kind.
    #[must_use]
    pub fn is_connector(self) -> bool {
        matches!(self, Part::Connector(_))
    }
}

/// Renderable geometry of a visual, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Line segments between indexed vertices (skeletons, cursor arrows).
    Lines {
        positions: Vec<Vec3>,
        segments: Vec<[u32; 2]>,
    },
    /// Triangle mesh (somata, region meshes).
    Mesh {
        vertices: Vec<Vec3>,
        faces: Vec<[u32; 3]>,
    },
    /// Square markers of the given size in canvas pixels (connectors, scatter).
    Points { positions: Vec<Vec3>, size: f32 },
}

impl Geometry {
    /// Builds a connected polyline through the given points.
    #[must_use]
    pub fn polyline(points: Vec<Vec3>) -> Self {
        let n = u32::try_from(points.len()).unwrap_or(u32::MAX);
        let segments = (1..n).map(|i| [i - 1, i]).collect();
        Geometry::Lines {
            positions: points,
            segments,
        }
    }

    /// Returns every vertex position.
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        match self {
            Geometry::Lines { positions, .. } | Geometry::Points { positions, .. } => positions,
            Geometry::Mesh { vertices, .. } => vertices,
        }
    }

    /// Returns the axis-aligned bounding box, or `None` when there are no vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let verts = self.vertices();
        let first = *verts.first()?;
        Some(
            verts
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }
}

/// A single renderable unit owned by the registry once added.
#[derive(Debug, Clone)]
pub struct Visual {
    object_id: ObjectId,
    entity_id: Option<EntityId>,
    name: Option<String>,
    part: Part,
    geometry: Geometry,
    visible: bool,
    color: Vec4,
    /// Pre-highlight colour; `Some` exactly while highlighted.
    stored_color: Option<Vec4>,
}

impl Visual {
    /// Creates a visible, white visual with a fresh object id.
    #[must_use]
    pub fn new(part: Part, geometry: Geometry) -> Self {
        Self {
            object_id: ObjectId::fresh(),
            entity_id: None,
            name: None,
            part,
            geometry,
            visible: true,
            color: Vec4::ONE,
            stored_color: None,
        }
    }

    /// Tags this visual with its owning entity.
    #[must_use]
    pub fn with_entity(mut self, entity_id: impl Into<EntityId>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Sets the display name shown in the legend and status line.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the initial colour.
    #[must_use]
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// Copies this visual under a fresh object id, dropping any highlight.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.object_id = ObjectId::fresh();
        if let Some(stored) = copy.stored_color.take() {
            copy.color = stored;
        }
        copy
    }

    #[must_use]
    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    #[must_use]
    pub fn entity_id(&self) -> Option<&EntityId> {
        self.entity_id.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn part(&self) -> Part {
        self.part
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Replaces the geometry (used for the cursor marker).
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Currently displayed colour.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Colour the visual has when not highlighted.
    #[must_use]
    pub fn base_color(&self) -> Vec4 {
        self.stored_color.unwrap_or(self.color)
    }

    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.stored_color.is_some()
    }

    /// Sets the base colour.
    ///
    /// While highlighted the highlight stays on screen and the new colour
    /// is what [`Visual::unhighlight`] restores.
    pub fn set_color(&mut self, color: Vec4) {
        match &mut self.stored_color {
            Some(stored) => *stored = color,
            None => self.color = color,
        }
    }

    /// Sets the alpha channel of both the displayed and the cached colour.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.color.w = alpha;
        if let Some(stored) = &mut self.stored_color {
            stored.w = alpha;
        }
    }

    /// Displays `highlight` and caches the current colour.
    ///
    /// The cache is only written when not already highlighted so that the
    /// true original survives repeated selection. Returns whether the
    /// displayed colour changed.
    pub fn highlight(&mut self, highlight: Vec4) -> bool {
        if self.stored_color.is_none() {
            self.stored_color = Some(self.color);
        }
        let changed = self.color != highlight;
        self.color = highlight;
        changed
    }

    /// Restores the cached pre-highlight colour. Returns whether anything changed.
    pub fn unhighlight(&mut self) -> bool {
        match self.stored_color.take() {
            Some(stored) => {
                self.color = stored;
                true
            }
            None => false,
        }
    }

    /// Bounding box of this visual's geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.geometry.bounds()
    }

    /// Legend / status text: `"{name} - #{entity}"`.
    #[must_use]
    pub fn display_label(&self) -> String {
        match (&self.name, &self.entity_id) {
            (Some(name), Some(id)) => format!("{name} - #{id}"),
            (None, Some(id)) => format!("#{id}"),
            (Some(name), None) => name.clone(),
            (None, None) => self.object_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soma() -> Visual {
        Visual::new(
            Part::Soma,
            Geometry::Points {
                positions: vec![Vec3::ZERO],
                size: 4.0,
            },
        )
        .with_entity("16")
        .with_color(Vec4::new(0.2, 0.4, 0.6, 1.0))
    }

    #[test]
    fn test_object_ids_are_unique() {
        let a = soma();
        let b = soma();
        assert_ne!(a.object_id(), b.object_id());
        assert_ne!(a.object_id(), a.duplicate().object_id());
    }

    #[test]
    fn test_highlight_keeps_true_original() {
        let mut v = soma();
        let original = v.color();
        v.highlight(Vec4::new(1.0, 0.9, 0.6, 1.0));
        v.highlight(Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert!(v.unhighlight());
        assert_eq!(v.color(), original);
        assert!(!v.is_highlighted());
        assert!(!v.unhighlight());
    }

    #[test]
    fn test_set_color_while_highlighted() {
        let mut v = soma();
        let highlight = Vec4::new(1.0, 0.9, 0.6, 1.0);
        v.highlight(highlight);
        v.set_color(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(v.color(), highlight);
        v.unhighlight();
        assert_eq!(v.color(), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_polyline_bounds() {
        let g = Geometry::polyline(vec![Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, -4.0, 5.0)]);
        assert_eq!(
            g.bounds(),
            Some((Vec3::new(-1.0, -4.0, 0.0), Vec3::new(3.0, 2.0, 5.0)))
        );
        if let Geometry::Lines { segments, .. } = g {
            assert_eq!(segments, vec![[0, 1]]);
        }
    }

    #[test]
    fn test_display_label() {
        let v = soma().with_name("DA1 lPN");
        assert_eq!(v.display_label(), "DA1 lPN - #16");
    }
}
