use std::collections::BTreeMap;

use glam::{Vec3, Vec4};
use neuroscope_core::color::{dim_alpha, validate_rgba};
use neuroscope_core::{ColorSpec, EntityId, ObjectId, Result, ViewerError};

use super::Viewer;

/// Alpha request for [`Viewer::set_alpha`].
#[derive(Debug, Clone, PartialEq)]
pub enum AlphaSpec {
    /// One alpha for every entity.
    Single(f32),
    /// Alphas keyed by entity.
    PerEntity(BTreeMap<EntityId, f32>),
}

impl From<f32> for AlphaSpec {
    fn from(alpha: f32) -> Self {
        Self::Single(alpha)
    }
}

impl From<BTreeMap<EntityId, f32>> for AlphaSpec {
    fn from(map: BTreeMap<EntityId, f32>) -> Self {
        Self::PerEntity(map)
    }
}

impl Viewer {
    /// Recolours entities.
    ///
    /// A per-entity map colours only the listed entities; any other spec is
    /// resolved to one colour per attached entity in sorted order.
    /// Connectors keep their colour unless `include_connectors` is set.
    /// Selected visuals keep showing the highlight and restore the new
    /// colour when deselected. Returns the number of visuals written.
    pub fn set_colors(&mut self, colors: impl Into<ColorSpec>, include_connectors: bool) -> Result<usize> {
        let colors = self.color_map_for(&colors.into())?;

        let _block = self.events.block();
        let mut written = 0;
        for (entity, color) in &colors {
            if !self.registry.contains_entity(entity) {
                log::debug!("no visuals to recolour for {entity}");
                continue;
            }
            for visual in self.registry.visuals_of_mut(entity) {
                if visual.part().is_connector() && !include_connectors {
                    continue;
                }
                visual.set_color(*color);
                written += 1;
            }
        }
        self.legend.refresh(&self.registry);
        Ok(written)
    }

    fn color_map_for(&self, spec: &ColorSpec) -> Result<BTreeMap<EntityId, Vec4>> {
        if let ColorSpec::PerEntity(map) = spec {
            for color in map.values() {
                validate_rgba(*color)?;
            }
            return Ok(map.clone());
        }
        let entities = self.registry.entity_ids();
        let resolved = self.colormaps.resolve_colormap(spec, entities.len())?;
        if resolved.len() != entities.len() {
            return Err(ViewerError::SizeMismatch {
                expected: entities.len(),
                actual: resolved.len(),
            });
        }
        Ok(entities.into_iter().zip(resolved).collect())
    }

    /// Sets alpha while keeping each visual's RGB.
    ///
    /// Visuals already at the requested alpha are skipped. Returns the
    /// number of visuals written.
    #[allow(clippy::float_cmp)]
    pub fn set_alpha(&mut self, alpha: impl Into<AlphaSpec>, include_connectors: bool) -> Result<usize> {
        let alphas: BTreeMap<EntityId, f32> = match alpha.into() {
            AlphaSpec::Single(a) => self.registry.entity_ids().into_iter().map(|e| (e, a)).collect(),
            AlphaSpec::PerEntity(map) => map,
        };
        if let Some(bad) = alphas.values().find(|a| !(0.0..=1.0).contains(*a)) {
            return Err(ViewerError::InvalidInput(format!("alpha {bad} outside [0, 1]")));
        }

        let _block = self.events.block();
        let mut written = 0;
        for (entity, alpha) in &alphas {
            for visual in self.registry.visuals_of_mut(entity) {
                if visual.part().is_connector() && !include_connectors {
                    continue;
                }
                if visual.color().w == *alpha {
                    continue;
                }
                visual.set_alpha(*alpha);
                written += 1;
            }
        }
        self.legend.refresh(&self.registry);
        Ok(written)
    }

    /// Gives every entity a distinct colour from a named palette.
    pub fn colorize(&mut self, palette: &str, include_connectors: bool) -> Result<usize> {
        self.set_colors(ColorSpec::Named(palette.to_string()), include_connectors)
    }

    /// Hides the given entities. Returns the number of visuals hidden.
    pub fn hide(&mut self, ids: &[EntityId]) -> usize {
        let _block = self.events.block();
        let mut hidden = 0;
        for entity in ids {
            if !self.registry.contains_entity(entity) {
                log::warn!("cannot hide {entity}: not in scene");
                continue;
            }
            for visual in self.registry.visuals_of_mut(entity) {
                if visual.is_visible() {
                    visual.set_visible(false);
                    hidden += 1;
                }
            }
        }
        self.legend.refresh(&self.registry);
        hidden
    }

    /// Hides every selected entity still in the scene.
    pub fn hide_selected(&mut self) -> usize {
        let selected = self.selection.live(&self.registry);
        self.hide(&selected)
    }

    /// Shows the given entities, or all of them when `ids` is `None`.
    ///
    /// With `check_alpha`, entities whose first visual is translucent are
    /// brought back to full opacity. Clears the status line and the
    /// cycled-to entities. Returns the number of visuals written.
    pub fn unhide(&mut self, ids: Option<&[EntityId]>, check_alpha: bool) -> usize {
        let ids = match ids {
            Some(ids) => ids.to_vec(),
            None => self.registry.entity_ids(),
        };

        let _block = self.events.block();
        let mut written = 0;
        for entity in &ids {
            if !self.registry.contains_entity(entity) {
                log::warn!("cannot unhide {entity}: not in scene");
                continue;
            }
            for visual in self.registry.visuals_of_mut(entity) {
                if !visual.is_visible() {
                    visual.set_visible(true);
                    written += 1;
                }
            }
            let translucent = self
                .registry
                .first_visual_of(entity)
                .is_some_and(|v| v.color().w < 1.0);
            if check_alpha && translucent {
                for visual in self.registry.visuals_of_mut(entity) {
                    visual.set_alpha(1.0);
                    written += 1;
                }
            }
        }
        self.legend.refresh(&self.registry);
        self.overlay.set_status("");
        self.active.clear();
        written
    }

    /// Flips the visibility of every visual of the given entities.
    pub fn toggle(&mut self, ids: &[EntityId]) -> usize {
        let _block = self.events.block();
        let mut toggled = 0;
        for entity in ids {
            for visual in self.registry.visuals_of_mut(entity) {
                visual.set_visible(!visual.is_visible());
                toggled += 1;
            }
        }
        if toggled == 0 {
            log::warn!("nothing to toggle for {ids:?}");
        }
        self.legend.refresh(&self.registry);
        toggled
    }

    /// Flips the visibility of the entity owning `object`, or of that visual
    /// alone if it has no entity. This is what clicking a legend label does.
    pub fn toggle_object(&mut self, object: ObjectId) -> usize {
        let Some(visual) = self.registry.get(object) else {
            log::warn!("cannot toggle {object}: not in scene");
            return 0;
        };
        if let Some(entity) = visual.entity_id().cloned() {
            return self.toggle(&[entity]);
        }
        if let Some(visual) = self.registry.get_mut(object) {
            visual.set_visible(!visual.is_visible());
        }
        self.legend.refresh(&self.registry);
        1
    }

    /// Moves focus by `increment` through the eligible entities and dims
    /// every other one according to the dim mode.
    ///
    /// Returns the entity now in focus, or `None` if nothing is eligible.
    pub fn cycle(&mut self, increment: i64) -> Option<EntityId> {
        let mode = self.options.dim_mode;
        let eligible = mode.eligible(&self.registry);
        let Some(index) = self.cycle.advance(increment, eligible.len()) else {
            log::debug!("nothing to cycle through");
            return None;
        };
        let focus = eligible[index].clone();

        let _block = self.events.block();
        let dim = dim_alpha(self.options.background_color);
        let written = mode.apply(&mut self.registry, &eligible, &focus, dim);
        log::debug!("cycled to {focus} ({written} visuals written)");

        self.active = vec![focus.clone()];
        let total = self.registry.entity_ids().len();
        self.overlay.set_status(format!("{focus} [{index}/{total}]"));
        self.legend.refresh(&self.registry);
        Some(focus)
    }

    pub fn show_legend(&self) -> bool {
        self.legend.is_visible()
    }

    /// Shows or hides the legend. Labels are kept either way.
    pub fn set_show_legend(&mut self, show: bool) {
        if show == self.legend.is_visible() {
            return;
        }
        let _block = self.events.block();
        self.legend.set_visible(show);
        self.legend.refresh(&self.registry);
    }

    pub fn legend_font_size(&self) -> f32 {
        self.legend.font_size()
    }

    pub fn set_legend_font_size(&mut self, font_size: f32) -> Result<()> {
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(ViewerError::InvalidInput(format!(
                "legend font size must be positive, got {font_size}"
            )));
        }
        self.legend.set_font_size(font_size);
        self.legend.refresh(&self.registry);
        Ok(())
    }

    /// Flips the whole overlay. Returns the new visibility.
    pub fn toggle_overlay(&mut self) -> bool {
        self.overlay.toggle()
    }

    /// Flips the FPS line. Returns the new visibility.
    pub fn toggle_fps(&mut self) -> bool {
        let show = !self.overlay.fps_visible();
        self.overlay.set_fps_visible(show);
        show
    }

    pub fn picking(&self) -> bool {
        self.picking
    }

    /// Enables or disables mouse picking and its help line.
    pub fn set_picking(&mut self, picking: bool) {
        self.picking = picking;
        self.overlay.set_picking_help_visible(picking);
        log::debug!("picking {}", if picking { "enabled" } else { "disabled" });
    }

    /// Flips picking. Returns the new state.
    pub fn toggle_picking(&mut self) -> bool {
        self.set_picking(!self.picking);
        self.picking
    }

    pub fn background_color(&self) -> Vec3 {
        self.options.background_color
    }

    pub fn set_background_color(&mut self, color: Vec3) -> Result<()> {
        validate_rgba(color.extend(1.0))?;
        self.options.background_color = color;
        self.overlay.set_background(color);
        Ok(())
    }
}
