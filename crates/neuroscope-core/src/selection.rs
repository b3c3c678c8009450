//! Selection set and highlight colour swapping.
//!
//! Selecting an entity caches each of its visuals' colours and displays the
//! highlight colour instead; deselecting restores the cache. Membership may
//! outlive the backing visuals: a removed entity simply stops resolving.

use glam::Vec4;

use crate::registry::Registry;
use crate::visual::EntityId;

/// Default highlight colour (pale yellow).
pub const DEFAULT_HIGHLIGHT: Vec4 = Vec4::new(1.0, 0.9, 0.6, 1.0);

/// Outcome of a selection update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    /// Entities that became selected.
    pub added: Vec<EntityId>,
    /// Entities that were deselected.
    pub removed: Vec<EntityId>,
    /// Number of visuals whose displayed colour was written.
    pub color_mutations: usize,
}

impl SelectionChange {
    /// Returns true if membership did not change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// The ordered, duplicate-free set of selected entities.
#[derive(Debug, Clone)]
pub struct SelectionState {
    selected: Vec<EntityId>,
    highlight_color: Vec4,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT)
    }
}

impl SelectionState {
    /// Creates an empty selection using the given highlight colour.
    #[must_use]
    pub fn new(highlight_color: Vec4) -> Self {
        Self {
            selected: Vec::new(),
            highlight_color,
        }
    }

    /// Currently selected entities.
    #[must_use]
    pub fn selected(&self) -> &[EntityId] {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, entity: &EntityId) -> bool {
        self.selected.contains(entity)
    }

    #[must_use]
    pub fn highlight_color(&self) -> Vec4 {
        self.highlight_color
    }

    /// Changes the highlight colour and repaints selected visuals with it.
    pub fn set_highlight_color(&mut self, registry: &mut Registry, color: Vec4) {
        self.highlight_color = color;
        for entity in &self.selected {
            for visual in registry.visuals_of_mut(entity) {
                visual.highlight(color);
            }
        }
    }

    /// Adds an entity to the selection and highlights it.
    ///
    /// Selecting an entity without live visuals is a no-op. Selecting a
    /// member again highlights any of its visuals added since. Returns the
    /// number of colour mutations.
    pub fn select(&mut self, registry: &mut Registry, entity: &EntityId) -> usize {
        let newly = !self.is_selected(entity);
        if newly && !registry.contains_entity(entity) {
            log::debug!("cannot select {entity}: no visuals attached");
            return 0;
        }
        let mutations = self.highlight_entity(registry, entity);
        if newly {
            self.selected.push(entity.clone());
        }
        mutations
    }

    /// Highlights every visual of every member. Returns the colour mutations.
    pub fn rehighlight(&self, registry: &mut Registry) -> usize {
        self.selected
            .iter()
            .map(|entity| self.highlight_entity(registry, entity))
            .sum()
    }

    fn highlight_entity(&self, registry: &mut Registry, entity: &EntityId) -> usize {
        let highlight = self.highlight_color;
        registry
            .visuals_of_mut(entity)
            .map(|v| v.highlight(highlight))
            .filter(|changed| *changed)
            .count()
    }

    /// Removes an entity from the selection and restores its colours.
    pub fn deselect(&mut self, registry: &mut Registry, entity: &EntityId) -> usize {
        let Some(pos) = self.selected.iter().position(|e| e == entity) else {
            return 0;
        };
        self.selected.remove(pos);
        let mutations = registry
            .visuals_of_mut(entity)
            .map(|v| v.unhighlight())
            .filter(|changed| *changed)
            .count();
        if mutations == 0 {
            log::debug!("deselected {entity} without live visuals");
        }
        mutations
    }

    /// Toggles membership. Returns whether the entity is now selected.
    pub fn toggle(&mut self, registry: &mut Registry, entity: &EntityId) -> bool {
        if self.is_selected(entity) {
            self.deselect(registry, entity);
            false
        } else {
            self.select(registry, entity);
            self.is_selected(entity)
        }
    }

    /// Replaces the selection, touching only entities whose membership changes.
    pub fn set_selection(
        &mut self,
        registry: &mut Registry,
        entities: impl IntoIterator<Item = EntityId>,
    ) -> SelectionChange {
        let mut wanted: Vec<EntityId> = Vec::new();
        for entity in entities {
            if !wanted.contains(&entity) {
                wanted.push(entity);
            }
        }

        let mut change = SelectionChange::default();

        let to_remove: Vec<EntityId> = self
            .selected
            .iter()
            .filter(|e| !wanted.contains(e))
            .cloned()
            .collect();
        for entity in to_remove {
            change.color_mutations += self.deselect(registry, &entity);
            change.removed.push(entity);
        }

        for entity in wanted {
            let member = self.is_selected(&entity);
            change.color_mutations += self.select(registry, &entity);
            if member {
                continue;
            }
            if self.is_selected(&entity) {
                change.added.push(entity);
            }
        }

        log::debug!(
            "{} entities selected (+{} / -{})",
            self.selected.len(),
            change.added.len(),
            change.removed.len()
        );
        change
    }

    /// Deselects everything.
    pub fn clear(&mut self, registry: &mut Registry) -> SelectionChange {
        self.set_selection(registry, std::iter::empty())
    }

    /// Selected entities that still have visuals attached.
    #[must_use]
    pub fn live(&self, registry: &Registry) -> Vec<EntityId> {
        self.selected
            .iter()
            .filter(|e| registry.contains_entity(e))
            .cloned()
            .collect()
    }

    /// Status line listing the selected entities' display names.
    #[must_use]
    pub fn status_text(&self, registry: &Registry) -> String {
        self.selected
            .iter()
            .filter_map(|e| registry.first_visual_of(e))
            .map(crate::visual::Visual::display_label)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Selector;
    use crate::visual::{Geometry, Part, Visual};
    use glam::Vec3;

    const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
    const BLUE: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

    fn scene() -> Registry {
        let mut registry = Registry::new();
        for (id, color) in [("A", RED), ("B", BLUE)] {
            registry
                .add(
                    Visual::new(Part::Body, Geometry::polyline(vec![Vec3::ZERO, Vec3::X]))
                        .with_entity(id)
                        .with_color(color),
                )
                .unwrap();
        }
        registry
    }

    fn color_of(registry: &Registry, id: &str) -> Vec4 {
        registry.first_visual_of(&EntityId::from(id)).unwrap().color()
    }

    #[test]
    fn test_select_scenario() {
        let mut registry = scene();
        let mut selection = SelectionState::default();

        selection.select(&mut registry, &"A".into());
        assert_eq!(color_of(&registry, "A"), DEFAULT_HIGHLIGHT);
        assert_eq!(color_of(&registry, "B"), BLUE);

        selection.select(&mut registry, &"B".into());
        assert_eq!(color_of(&registry, "B"), DEFAULT_HIGHLIGHT);

        selection.set_selection(&mut registry, [EntityId::from("B")]);
        assert_eq!(color_of(&registry, "A"), RED);
        assert_eq!(color_of(&registry, "B"), DEFAULT_HIGHLIGHT);
        assert_eq!(selection.selected(), &[EntityId::from("B")]);
    }

    #[test]
    fn test_set_selection_is_idempotent() {
        let mut registry = scene();
        let mut selection = SelectionState::default();
        let wanted = [EntityId::from("A"), EntityId::from("B")];
        let first = selection.set_selection(&mut registry, wanted.clone());
        assert_eq!(first.color_mutations, 2);
        let second = selection.set_selection(&mut registry, wanted);
        assert_eq!(second.color_mutations, 0);
        assert!(second.is_empty());
    }

    #[test]
    fn test_reselect_highlights_late_visuals() {
        let mut registry = scene();
        let mut selection = SelectionState::default();
        let a = EntityId::from("A");
        selection.select(&mut registry, &a);
        registry
            .add(
                Visual::new(Part::Soma, Geometry::polyline(vec![Vec3::Y]))
                    .with_entity("A")
                    .with_color(BLUE),
            )
            .unwrap();

        assert_eq!(selection.select(&mut registry, &a), 1);
        assert_eq!(selection.selected(), &[a.clone()]);
        assert!(registry.visuals_of(&a).all(|v| v.color() == DEFAULT_HIGHLIGHT));
        assert_eq!(selection.select(&mut registry, &a), 0);

        selection.deselect(&mut registry, &a);
        let colors: Vec<Vec4> = registry.visuals_of(&a).map(Visual::color).collect();
        assert_eq!(colors, vec![RED, BLUE]);
    }

    #[test]
    fn test_select_deselect_roundtrip_is_exact() {
        let mut registry = scene();
        let odd = Vec4::new(0.123_456_7, 0.765_432_1, 0.333_333_3, 0.5);
        registry
            .add(
                Visual::new(Part::Soma, Geometry::polyline(vec![Vec3::Y]))
                    .with_entity("A")
                    .with_color(odd),
            )
            .unwrap();
        let mut selection = SelectionState::default();
        let a = EntityId::from("A");
        selection.select(&mut registry, &a);
        selection.deselect(&mut registry, &a);
        let colors: Vec<Vec4> = registry.visuals_of(&a).map(Visual::color).collect();
        assert_eq!(colors, vec![RED, odd]);
    }

    #[test]
    fn test_missing_entity_is_noop() {
        let mut registry = scene();
        let mut selection = SelectionState::default();
        assert_eq!(selection.select(&mut registry, &"ghost".into()), 0);
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_membership_survives_removal() {
        let mut registry = scene();
        let mut selection = SelectionState::default();
        selection.select(&mut registry, &"A".into());
        registry.remove(&Selector::Entities(vec!["A".into()]));
        assert_eq!(selection.selected().len(), 1);
        assert!(selection.live(&registry).is_empty());
        let change = selection.clear(&mut registry);
        assert_eq!(change.removed, vec![EntityId::from("A")]);
        assert_eq!(change.color_mutations, 0);
    }

    #[test]
    fn test_toggle_and_status() {
        let mut registry = Registry::new();
        registry
            .add(
                Visual::new(Part::Body, Geometry::polyline(vec![Vec3::ZERO]))
                    .with_entity("7")
                    .with_name("PN"),
            )
            .unwrap();
        let mut selection = SelectionState::default();
        assert!(selection.toggle(&mut registry, &"7".into()));
        assert_eq!(selection.status_text(&registry), "PN - #7");
        assert!(!selection.toggle(&mut registry, &"7".into()));
        assert_eq!(selection.status_text(&registry), "");
    }
}
