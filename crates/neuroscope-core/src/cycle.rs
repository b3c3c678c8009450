//! Cycling focus through entities one at a time.

use serde::{Deserialize, Serialize};

use crate::registry::Registry;
use crate::visual::EntityId;

/// How non-focal entities are de-emphasised while cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimMode {
    /// Non-focal entities are hidden. Cycles over every entity.
    Hide,
    /// Non-focal entities are faded to a background-dependent alpha.
    /// Cycles over visible entities only.
    #[default]
    Alpha,
}

impl DimMode {
    /// Sorted entity ids eligible for cycling under this mode.
    #[must_use]
    pub fn eligible(self, registry: &Registry) -> Vec<EntityId> {
        match self {
            DimMode::Hide => registry.entity_ids(),
            DimMode::Alpha => registry.visible_entities(),
        }
    }

    /// Brings `focus` to full prominence and dims every other eligible entity.
    ///
    /// Returns the number of visuals written.
    pub fn apply(
        self,
        registry: &mut Registry,
        eligible: &[EntityId],
        focus: &EntityId,
        dim_alpha: f32,
    ) -> usize {
        let mut written = 0;
        for entity in eligible {
            let is_focus = entity == focus;
            match self {
                DimMode::Hide => {
                    for visual in registry.visuals_of_mut(entity) {
                        if visual.is_visible() != is_focus {
                            visual.set_visible(is_focus);
                            written += 1;
                        }
                    }
                }
                DimMode::Alpha => {
                    let target = if is_focus { 1.0 } else { dim_alpha };
                    let current = registry.first_visual_of(entity).map(|v| v.color().w);
                    if current == Some(target) {
                        continue;
                    }
                    for visual in registry.visuals_of_mut(entity) {
                        visual.set_alpha(target);
                        written += 1;
                    }
                }
            }
        }
        written
    }
}

/// Index into the sorted list of eligible entities.
///
/// Starts unset; the first step lands on the first entity going forward
/// and on the last entity going backward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleCursor {
    index: Option<usize>,
}

impl CycleCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position, if any step has been taken.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Forgets the current position.
    pub fn reset(&mut self) {
        self.index = None;
    }

    /// Moves by `increment`, wrapping around `len` eligible entities.
    ///
    /// An out-of-range position left over from a larger eligible set is
    /// wrapped before stepping. Returns `None` when nothing is eligible.
    pub fn advance(&mut self, increment: i64, len: usize) -> Option<usize> {
        if len == 0 {
            self.index = None;
            return None;
        }
        let len_i = i64::try_from(len).unwrap_or(i64::MAX);
        let start = match self.index {
            Some(i) => i64::try_from(i % len).unwrap_or(0),
            None if increment > 0 => -1,
            None => 0,
        };
        let next = (start + increment).rem_euclid(len_i);
        let next = usize::try_from(next).unwrap_or(0);
        self.index = Some(next);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::{Geometry, Part, Visual};
    use glam::Vec3;
    use proptest::prelude::*;

    fn scene(n: usize) -> Registry {
        let mut registry = Registry::new();
        for i in 0..n {
            registry
                .add(
                    Visual::new(Part::Body, Geometry::polyline(vec![Vec3::ZERO, Vec3::X]))
                        .with_entity(format!("n{i:02}")),
                )
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_first_step_from_unset() {
        let mut c = CycleCursor::new();
        assert_eq!(c.advance(1, 4), Some(0));
        let mut c = CycleCursor::new();
        assert_eq!(c.advance(-1, 4), Some(3));
        let mut c = CycleCursor::new();
        assert_eq!(c.advance(0, 4), Some(0));
    }

    #[test]
    fn test_empty_eligible_set() {
        let mut c = CycleCursor::new();
        c.advance(1, 3);
        assert_eq!(c.advance(1, 0), None);
        assert_eq!(c.index(), None);
    }

    #[test]
    fn test_shrinking_set_is_clamped() {
        let mut c = CycleCursor::new();
        c.advance(1, 10);
        c.advance(8, 10);
        assert_eq!(c.index(), Some(8));
        assert_eq!(c.advance(1, 3), Some(0));
    }

    #[test]
    fn test_hide_mode_keeps_one_visible() {
        let mut registry = scene(3);
        let eligible = DimMode::Hide.eligible(&registry);
        DimMode::Hide.apply(&mut registry, &eligible, &eligible[1], 0.1);
        assert_eq!(registry.visible_entities(), vec![eligible[1].clone()]);
    }

    #[test]
    fn test_alpha_mode_skips_hidden() {
        let mut registry = scene(3);
        for v in registry.visuals_of_mut(&EntityId::from("n00")) {
            v.set_visible(false);
        }
        let eligible = DimMode::Alpha.eligible(&registry);
        assert_eq!(eligible.len(), 2);
        DimMode::Alpha.apply(&mut registry, &eligible, &eligible[0], 0.25);
        let alpha = |id: &str| registry.first_visual_of(&id.into()).unwrap().color().w;
        assert_eq!(alpha("n01"), 1.0);
        assert_eq!(alpha("n02"), 0.25);
        assert_eq!(alpha("n00"), 1.0);
    }

    proptest! {
        #[test]
        fn full_cycle_returns_to_start(len in 1usize..50, start in 0usize..50, backward in any::<bool>()) {
            let mut c = CycleCursor::new();
            c.advance(1, len);
            c.advance(i64::try_from(start).unwrap(), len);
            let origin = c.index();
            let step = if backward { -1 } else { 1 };
            for _ in 0..len {
                c.advance(step, len);
            }
            prop_assert_eq!(c.index(), origin);
        }

        #[test]
        fn alpha_cycle_has_single_focus(n in 1usize..8, steps in 1usize..20) {
            let mut registry = scene(n);
            let mut c = CycleCursor::new();
            for _ in 0..steps {
                let eligible = DimMode::Alpha.eligible(&registry);
                let idx = c.advance(1, eligible.len()).unwrap();
                DimMode::Alpha.apply(&mut registry, &eligible, &eligible[idx], 0.05);
                let prominent = registry
                    .all_visuals()
                    .iter()
                    .filter(|v| v.color().w == 1.0)
                    .count();
                prop_assert_eq!(prominent, 1);
            }
        }
    }
}
