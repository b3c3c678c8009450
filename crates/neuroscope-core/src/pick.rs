//! Pick targets and the flat identifier table of an identity pass.

use crate::overlay::OverlayLine;
use crate::visual::{EntityId, ObjectId};

/// Something that can be hit by a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    /// A scene visual.
    Visual(ObjectId),
    /// A legend entry.
    LegendLabel {
        object_id_ref: ObjectId,
        entity_id: EntityId,
    },
    /// A structural overlay widget. Never actionable.
    Widget(OverlayLine),
}

impl PickTarget {
    /// Whether the dispatcher should skip this hit and keep looking.
    #[must_use]
    pub fn is_widget(&self) -> bool {
        matches!(self, PickTarget::Widget(_))
    }
}

/// Maps the flat ids written by an identity pass back to their targets.
///
/// Id 0 is reserved for the background; targets get 1, 2, 3... in
/// registration order.
#[derive(Debug, Clone, Default)]
pub struct PickIndex {
    targets: Vec<PickTarget>,
}

impl PickIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a target and returns its flat id.
    pub fn register(&mut self, target: PickTarget) -> u32 {
        self.targets.push(target);
        u32::try_from(self.targets.len()).unwrap_or(u32::MAX)
    }

    /// Looks up a flat id. Returns `None` for the background or unknown ids.
    #[must_use]
    pub fn resolve(&self, id: u32) -> Option<&PickTarget> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.targets.get(index)
    }

    /// Resolves ids in order, silently dropping unknown ones.
    #[must_use]
    pub fn resolve_all(&self, ids: &[u32]) -> Vec<PickTarget> {
        ids.iter().filter_map(|id| self.resolve(*id)).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
