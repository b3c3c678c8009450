//! Manual classification by keystroke.
//!
//! After [`Viewer::label_setup`] every unbound key mapped to a label tags
//! the entities in focus with that label and cycles to the next entity.

use std::collections::BTreeMap;

use neuroscope_core::options::normalize_key;
use neuroscope_core::{EntityId, Result, ViewerError};

use super::Viewer;

impl Viewer {
    /// Binds keys to labels and enters labeling mode.
    ///
    /// Keys already bound to a viewer action are rejected. Previous label
    /// assignments are discarded and focus moves to the first entity.
    pub fn label_setup(&mut self, labels: BTreeMap<char, String>) -> Result<()> {
        let mut keys = BTreeMap::new();
        for (key, label) in labels {
            if self.options.keymap.is_bound(key) {
                return Err(ViewerError::KeyInUse(key));
            }
            keys.insert(normalize_key(key), label);
        }
        log::info!("labeling mode: {} keys bound", keys.len());

        self.label_keys = keys;
        self.label_mode = true;
        self.label_assignments.clear();
        self.cycle.reset();
        self.cycle(0);
        Ok(())
    }

    pub fn label_mode(&self) -> bool {
        self.label_mode
    }

    /// Leaves labeling mode, keeping the assignments made so far.
    pub fn exit_label_mode(&mut self) {
        self.label_mode = false;
    }

    /// Entities per configured label, sorted. Unused labels map to an empty list.
    pub fn labels(&self) -> BTreeMap<String, Vec<EntityId>> {
        let mut labels: BTreeMap<String, Vec<EntityId>> = self
            .label_keys
            .values()
            .map(|label| (label.clone(), Vec::new()))
            .collect();
        for (entity, label) in &self.label_assignments {
            labels.entry(label.clone()).or_default().push(entity.clone());
        }
        labels
    }

    /// Tags the entities in focus with the label bound to `key` and moves
    /// on. Returns whether a label was applied.
    pub fn apply_label(&mut self, key: char) -> bool {
        if !self.label_mode {
            return false;
        }
        let Some(label) = self.label_keys.get(&normalize_key(key)).cloned() else {
            return false;
        };
        for entity in &self.active {
            self.label_assignments.insert(entity.clone(), label.clone());
        }
        log::debug!("labelled {:?} as {label}", self.active);
        self.cycle(1);
        true
    }
}
