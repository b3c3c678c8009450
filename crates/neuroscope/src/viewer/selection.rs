use glam::Vec4;
use neuroscope_core::color::validate_rgba;
use neuroscope_core::{EntityId, Result, SelectionChange};

use super::Viewer;

impl Viewer {
    /// Currently selected entities.
    pub fn selected(&self) -> &[EntityId] {
        self.selection.selected()
    }

    /// Replaces the selection.
    ///
    /// Only entities whose membership changes are repainted. Refreshes the
    /// legend and the status line.
    pub fn set_selected(&mut self, ids: impl IntoIterator<Item = EntityId>) -> SelectionChange {
        let _block = self.events.block();
        let change = self.selection.set_selection(&mut self.registry, ids);
        self.legend.refresh(&self.registry);
        self.overlay.set_status(self.selection.status_text(&self.registry));
        change
    }

    /// Adds entities to the selection.
    pub fn select(&mut self, ids: impl IntoIterator<Item = EntityId>) -> SelectionChange {
        let mut wanted = self.selection.selected().to_vec();
        wanted.extend(ids);
        self.set_selected(wanted)
    }

    /// Removes entities from the selection.
    pub fn deselect(&mut self, ids: &[EntityId]) -> SelectionChange {
        let wanted: Vec<EntityId> = self
            .selection
            .selected()
            .iter()
            .filter(|e| !ids.contains(e))
            .cloned()
            .collect();
        self.set_selected(wanted)
    }

    /// Flips one entity's membership. Returns whether it is now selected.
    pub fn toggle_select(&mut self, entity: &EntityId) -> bool {
        if self.selection.is_selected(entity) {
            self.deselect(std::slice::from_ref(entity));
        } else {
            self.select([entity.clone()]);
        }
        self.selection.is_selected(entity)
    }

    pub fn clear_selection(&mut self) -> SelectionChange {
        self.set_selected(std::iter::empty())
    }

    pub fn highlight_color(&self) -> Vec4 {
        self.selection.highlight_color()
    }

    /// Changes the highlight colour, repainting the current selection.
    pub fn set_highlight_color(&mut self, color: Vec4) -> Result<()> {
        let color = validate_rgba(color)?;
        let _block = self.events.block();
        self.selection.set_highlight_color(&mut self.registry, color);
        self.options.highlight_color = color;
        self.legend.refresh(&self.registry);
        Ok(())
    }
}
