//! Legend listing every entity currently in the scene.
//!
//! The legend is derived state: [`Legend::refresh`] rebuilds it from the
//! registry and is idempotent. Hiding the legend hides its labels without
//! dropping them.

use std::collections::BTreeMap;

use glam::{Vec2, Vec4};

use crate::color::LEGEND_HIDDEN_GRAY;
use crate::overlay::{text_rect, ScreenRect, TextAnchor};
use crate::registry::Registry;
use crate::visual::{EntityId, ObjectId};

/// Default legend font size.
pub const DEFAULT_LEGEND_FONT_SIZE: f32 = 7.0;

/// A single legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLabel {
    /// Object id of the group's first visual.
    pub object_id_ref: ObjectId,
    pub entity_id: EntityId,
    pub text: String,
    /// Top-left corner in canvas pixels.
    pub position: Vec2,
    pub color: Vec4,
    pub font_size: f32,
    pub visible: bool,
}

impl LegendLabel {
    /// Approximate screen rectangle of the label.
    #[must_use]
    pub fn rect(&self) -> ScreenRect {
        text_rect(&self.text, self.position, TextAnchor::TopLeft, self.font_size)
    }
}

/// Labels created and destroyed by one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegendDiff {
    pub created: Vec<EntityId>,
    pub removed: Vec<EntityId>,
}

/// The on-screen legend.
#[derive(Debug, Clone)]
pub struct Legend {
    labels: BTreeMap<EntityId, LegendLabel>,
    visible: bool,
    font_size: f32,
    left: f32,
    top: f32,
}

impl Legend {
    /// Creates a hidden, empty legend anchored at `(left, top)`.
    #[must_use]
    pub fn new(font_size: f32, left: f32, top: f32) -> Self {
        Self {
            labels: BTreeMap::new(),
            visible: false,
            font_size,
            left,
            top,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the legend. Call [`Legend::refresh`] afterwards.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.font_size = font_size;
    }

    /// Moves the legend's top-left anchor.
    pub fn set_origin(&mut self, left: f32, top: f32) {
        self.left = left;
        self.top = top;
    }

    /// Vertical distance between consecutive labels.
    #[must_use]
    pub fn line_spacing(&self) -> f32 {
        10.0 * self.font_size / 7.0
    }

    /// Synchronises labels with the registry.
    ///
    /// Stale labels are dropped, new entity groups get a label, and every
    /// label is recoloured from its group's first visual (gray if hidden)
    /// and restacked top to bottom in attachment order.
    pub fn refresh(&mut self, registry: &Registry) -> LegendDiff {
        let groups = registry.groups_by_entity();
        let mut diff = LegendDiff::default();

        self.labels.retain(|entity, _| {
            let keep = groups.contains_key(entity);
            if !keep {
                diff.removed.push(entity.clone());
            }
            keep
        });

        let mut order: Vec<(ObjectId, &EntityId)> = groups
            .iter()
            .map(|(entity, visuals)| (visuals[0].object_id(), entity))
            .collect();
        order.sort();

        let spacing = self.line_spacing();
        let (font_size, visible) = (self.font_size, self.visible);
        for (i, (first_id, entity)) in order.into_iter().enumerate() {
            let first = &groups[entity][0];
            let color = if first.is_visible() {
                first.color()
            } else {
                LEGEND_HIDDEN_GRAY
            };
            #[allow(clippy::cast_precision_loss)]
            let position = Vec2::new(self.left, self.top + spacing * (i + 1) as f32);

            let label = self.labels.entry(entity.clone()).or_insert_with(|| {
                diff.created.push(entity.clone());
                LegendLabel {
                    object_id_ref: first_id,
                    entity_id: entity.clone(),
                    text: first.display_label(),
                    position,
                    color,
                    font_size,
                    visible,
                }
            });
            label.object_id_ref = first_id;
            label.text = first.display_label();
            label.position = position;
            label.color = color;
            label.font_size = font_size;
            label.visible = visible;
        }

        if !diff.created.is_empty() || !diff.removed.is_empty() {
            log::debug!(
                "legend: {} labels (+{} / -{})",
                self.labels.len(),
                diff.created.len(),
                diff.removed.len()
            );
        }
        diff
    }

    /// Number of labels, shown or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in display order, top to bottom.
    #[must_use]
    pub fn labels(&self) -> Vec<&LegendLabel> {
        let mut labels: Vec<&LegendLabel> = self.labels.values().collect();
        labels.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        labels
    }

    #[must_use]
    pub fn label_for(&self, entity: &EntityId) -> Option<&LegendLabel> {
        self.labels.get(entity)
    }

    /// Visible label whose rectangle contains the canvas point.
    #[must_use]
    pub fn label_at(&self, point: Vec2) -> Option<&LegendLabel> {
        self.labels
            .values()
            .find(|l| l.visible && l.rect().contains(point))
    }

    /// Drops every label.
    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::new(DEFAULT_LEGEND_FONT_SIZE, 10.0, 20.0)
    }
}
