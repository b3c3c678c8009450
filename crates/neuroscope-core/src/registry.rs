//! Object registry for visuals attached to the scene.
//!
//! The registry keeps a single attachment list in insertion order. Every
//! query recomputes its grouping from that list, so adds and removes are
//! reflected everywhere immediately and no index can go stale.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;

use crate::error::{Result, ViewerError};
use crate::visual::{ConnectorKind, EntityId, ObjectId, Part, Visual};

/// Which visuals a removal applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every visual belonging to any of these entities.
    Entities(Vec<EntityId>),
    /// Exactly these visuals.
    Objects(Vec<ObjectId>),
}

impl Selector {
    fn matches(&self, visual: &Visual) -> bool {
        match self {
            Selector::Entities(ids) => visual.entity_id().is_some_and(|e| ids.contains(e)),
            Selector::Objects(ids) => ids.contains(&visual.object_id()),
        }
    }
}

impl From<EntityId> for Selector {
    fn from(id: EntityId) -> Self {
        Selector::Entities(vec![id])
    }
}

impl From<ObjectId> for Selector {
    fn from(id: ObjectId) -> Self {
        Selector::Objects(vec![id])
    }
}

impl From<Vec<EntityId>> for Selector {
    fn from(ids: Vec<EntityId>) -> Self {
        Selector::Entities(ids)
    }
}

impl From<Vec<ObjectId>> for Selector {
    fn from(ids: Vec<ObjectId>) -> Self {
        Selector::Objects(ids)
    }
}

/// Registry owning every visual currently attached to the scene.
#[derive(Debug, Default)]
pub struct Registry {
    visuals: Vec<Visual>,
}

impl Registry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a visual.
    ///
    /// Fails if the visual has no entity id and is not a cursor.
    pub fn add(&mut self, visual: Visual) -> Result<ObjectId> {
        Self::check(&visual)?;
        let id = visual.object_id();
        self.visuals.push(visual);
        Ok(id)
    }

    /// Attaches a batch of visuals.
    ///
    /// Validates the whole batch first; on error nothing is attached.
    pub fn add_all(&mut self, visuals: Vec<Visual>) -> Result<Vec<ObjectId>> {
        for visual in &visuals {
            Self::check(visual)?;
        }
        let ids = visuals.iter().map(Visual::object_id).collect();
        self.visuals.extend(visuals);
        Ok(ids)
    }

    fn check(visual: &Visual) -> Result<()> {
        if visual.part().requires_entity() && visual.entity_id().is_none() {
            return Err(ViewerError::MissingEntityId(visual.object_id()));
        }
        Ok(())
    }

    /// Detaches every matching visual and hands them back to the caller.
    pub fn remove(&mut self, selector: &Selector) -> Vec<Visual> {
        let (removed, kept): (Vec<Visual>, Vec<Visual>) = std::mem::take(&mut self.visuals)
            .into_iter()
            .partition(|v| selector.matches(v));
        self.visuals = kept;
        removed
    }

    /// Detaches every visual. Returns how many were attached.
    pub fn clear(&mut self) -> usize {
        let n = self.visuals.len();
        self.visuals.clear();
        n
    }

    /// Gets a visual by object id.
    pub fn get(&self, id: ObjectId) -> Option<&Visual> {
        self.visuals.iter().find(|v| v.object_id() == id)
    }

    /// Gets a mutable visual by object id.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Visual> {
        self.visuals.iter_mut().find(|v| v.object_id() == id)
    }

    /// Checks if a visual is attached.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// All attached visuals in attachment order.
    pub fn all_visuals(&self) -> &[Visual] {
        &self.visuals
    }

    /// Returns a mutable iterator over all visuals.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Visual> + '_ {
        self.visuals.iter_mut()
    }

    /// Returns the number of attached visuals.
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    /// Returns true if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Maps each entity id to its visuals, in attachment order.
    pub fn groups_by_entity(&self) -> BTreeMap<EntityId, Vec<&Visual>> {
        let mut groups: BTreeMap<EntityId, Vec<&Visual>> = BTreeMap::new();
        for visual in &self.visuals {
            if let Some(id) = visual.entity_id() {
                groups.entry(id.clone()).or_default().push(visual);
            }
        }
        groups
    }

    /// Sorted distinct entity ids.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.visuals
            .iter()
            .filter_map(Visual::entity_id)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Checks if any visual belongs to the entity.
    pub fn contains_entity(&self, entity: &EntityId) -> bool {
        self.visuals.iter().any(|v| v.entity_id() == Some(entity))
    }

    /// Visuals of one entity.
    pub fn visuals_of<'a>(&'a self, entity: &'a EntityId) -> impl Iterator<Item = &'a Visual> + 'a {
        self.visuals
            .iter()
            .filter(move |v| v.entity_id() == Some(entity))
    }

    /// Mutable visuals of one entity.
    pub fn visuals_of_mut<'a>(
        &'a mut self,
        entity: &'a EntityId,
    ) -> impl Iterator<Item = &'a mut Visual> + 'a {
        self.visuals
            .iter_mut()
            .filter(move |v| v.entity_id() == Some(entity))
    }

    /// First-attached visual of an entity; represents the group's state.
    pub fn first_visual_of(&self, entity: &EntityId) -> Option<&Visual> {
        self.visuals.iter().find(|v| v.entity_id() == Some(entity))
    }

    /// Entities whose representative visual is visible, sorted.
    pub fn visible_entities(&self) -> Vec<EntityId> {
        self.groups_by_entity()
            .into_iter()
            .filter(|(_, vs)| vs[0].is_visible())
            .map(|(id, _)| id)
            .collect()
    }

    /// Entities whose representative visual is hidden, sorted.
    pub fn hidden_entities(&self) -> Vec<EntityId> {
        self.groups_by_entity()
            .into_iter()
            .filter(|(_, vs)| !vs[0].is_visible())
            .map(|(id, _)| id)
            .collect()
    }

    /// Body visuals.
    pub fn bodies(&self) -> Vec<&Visual> {
        self.of_part(|p| p == Part::Body)
    }

    /// Soma visuals.
    pub fn somas(&self) -> Vec<&Visual> {
        self.of_part(|p| p == Part::Soma)
    }

    /// Connector visuals of one kind.
    pub fn connectors_of_kind(&self, kind: ConnectorKind) -> Vec<&Visual> {
        self.of_part(|p| p == Part::Connector(kind))
    }

    /// Cursor marker visuals.
    pub fn cursors(&self) -> Vec<&Visual> {
        self.of_part(|p| p == Part::Cursor)
    }

    fn of_part(&self, keep: impl Fn(Part) -> bool) -> Vec<&Visual> {
        self.visuals.iter().filter(|v| keep(v.part())).collect()
    }

    /// Union of the bounding boxes of all non-cursor visuals.
    pub fn scene_bounds(&self) -> Option<(Vec3, Vec3)> {
        union_bounds(self.visuals.iter().filter(|v| v.part() != Part::Cursor))
    }
}

/// Union of the axis-aligned bounding boxes of the given visuals.
pub fn union_bounds<'a>(visuals: impl IntoIterator<Item = &'a Visual>) -> Option<(Vec3, Vec3)> {
    visuals
        .into_iter()
        .filter_map(Visual::bounds)
        .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::Geometry;
    use proptest::prelude::*;

    fn neuron(id: &str, part: Part) -> Visual {
        Visual::new(part, Geometry::polyline(vec![Vec3::ZERO, Vec3::ONE])).with_entity(id)
    }

    #[test]
    fn test_add_requires_entity() {
        let mut registry = Registry::new();
        let orphan = Visual::new(Part::Body, Geometry::polyline(vec![Vec3::ZERO]));
        assert!(matches!(
            registry.add(orphan),
            Err(ViewerError::MissingEntityId(_))
        ));
        let cursor = Visual::new(Part::Cursor, Geometry::polyline(vec![Vec3::ZERO]));
        assert!(registry.add(cursor).is_ok());
        assert!(registry.groups_by_entity().is_empty());
    }

    #[test]
    fn test_add_all_is_atomic() {
        let mut registry = Registry::new();
        let batch = vec![
            neuron("1", Part::Body),
            Visual::new(Part::Soma, Geometry::polyline(vec![Vec3::ZERO])),
        ];
        assert!(registry.add_all(batch).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_by_entity_and_object() {
        let mut registry = Registry::new();
        registry.add(neuron("1", Part::Body)).unwrap();
        let soma = registry.add(neuron("1", Part::Soma)).unwrap();
        registry.add(neuron("2", Part::Body)).unwrap();

        let removed = registry.remove(&Selector::from(soma));
        assert_eq!(removed.len(), 1);
        assert_eq!(registry.visuals_of(&EntityId::from("1")).count(), 1);

        registry.remove(&Selector::Entities(vec!["1".into()]));
        assert_eq!(registry.entity_ids(), vec![EntityId::from("2")]);
    }

    #[test]
    fn test_part_queries() {
        let mut registry = Registry::new();
        registry.add(neuron("1", Part::Body)).unwrap();
        registry.add(neuron("1", Part::Soma)).unwrap();
        registry
            .add(neuron("1", Part::Connector(ConnectorKind::Presynapse)))
            .unwrap();
        registry
            .add(neuron("1", Part::Connector(ConnectorKind::Postsynapse)))
            .unwrap();
        assert_eq!(registry.bodies().len(), 1);
        assert_eq!(registry.somas().len(), 1);
        assert_eq!(registry.connectors_of_kind(ConnectorKind::Presynapse).len(), 1);
        assert_eq!(registry.connectors_of_kind(ConnectorKind::GapJunction).len(), 0);
    }

    #[test]
    fn test_visible_and_hidden_entities() {
        let mut registry = Registry::new();
        registry.add(neuron("a", Part::Body)).unwrap();
        registry.add(neuron("b", Part::Body)).unwrap();
        for v in registry.visuals_of_mut(&EntityId::from("b")) {
            v.set_visible(false);
        }
        assert_eq!(registry.visible_entities(), vec![EntityId::from("a")]);
        assert_eq!(registry.hidden_entities(), vec![EntityId::from("b")]);
    }

    #[test]
    fn test_scene_bounds_skips_cursor() {
        let mut registry = Registry::new();
        registry.add(neuron("a", Part::Body)).unwrap();
        registry
            .add(Visual::new(
                Part::Cursor,
                Geometry::polyline(vec![Vec3::splat(-1000.0), Vec3::ZERO]),
            ))
            .unwrap();
        assert_eq!(registry.scene_bounds(), Some((Vec3::ZERO, Vec3::ONE)));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8),
        RemoveEntity(u8),
        RemoveFirstObject,
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..6).prop_map(Op::Add),
            2 => (0u8..6).prop_map(Op::RemoveEntity),
            1 => Just(Op::RemoveFirstObject),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn groups_match_attached_entities(ops in proptest::collection::vec(op(), 0..40)) {
            let mut registry = Registry::new();
            for op in ops {
                match op {
                    Op::Add(e) => {
                        registry.add(neuron(&e.to_string(), Part::Body)).unwrap();
                    }
                    Op::RemoveEntity(e) => {
                        registry.remove(&Selector::Entities(vec![EntityId::from(e.to_string())]));
                    }
                    Op::RemoveFirstObject => {
                        if let Some(id) = registry.all_visuals().first().map(Visual::object_id) {
                            registry.remove(&Selector::from(id));
                        }
                    }
                    Op::Clear => {
                        registry.clear();
                    }
                }
                let expected: BTreeSet<EntityId> = registry
                    .all_visuals()
                    .iter()
                    .filter_map(|v| v.entity_id().cloned())
                    .collect();
                let grouped: BTreeSet<EntityId> = registry.groups_by_entity().into_keys().collect();
                prop_assert_eq!(grouped, expected);
            }
        }
    }
}
