use std::collections::BTreeMap;

use glam::UVec2;
use neuroscope_core::registry::union_bounds;
use neuroscope_core::{
    ColorSpec, EntityId, ObjectId, Part, Result, Selector, ViewPreset, ViewerError, Visual,
};

use super::{aspect_ratio, Viewer};

/// Options for [`Viewer::add`].
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Refit the camera to the scene afterwards.
    pub center: bool,
    /// Detach everything before adding.
    pub clear: bool,
    /// Colours for the new entities' bodies and somata.
    pub color: Option<ColorSpec>,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            center: true,
            clear: false,
            color: None,
        }
    }
}

impl AddOptions {
    #[must_use]
    pub fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    #[must_use]
    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Viewer {
    /// Attaches visuals to the scene.
    ///
    /// Fails without touching the scene if `visuals` is empty, if a
    /// non-cursor visual lacks an entity id or if the colour cannot be
    /// resolved.
    pub fn add(&mut self, mut visuals: Vec<Visual>, options: &AddOptions) -> Result<Vec<ObjectId>> {
        if visuals.is_empty() {
            return Err(ViewerError::NoVisualsGenerated);
        }
        if let Some(orphan) = visuals
            .iter()
            .find(|v| v.part().requires_entity() && v.entity_id().is_none())
        {
            return Err(ViewerError::MissingEntityId(orphan.object_id()));
        }
        if let Some(spec) = &options.color {
            self.apply_add_colors(&mut visuals, spec)?;
        }

        let _block = self.events.block();
        if options.clear {
            self.clear();
        }
        let added = self.registry.add_all(visuals)?;
        self.selection.rehighlight(&mut self.registry);
        log::info!(
            "added {} visuals ({} entities in scene)",
            added.len(),
            self.registry.entity_ids().len()
        );

        if options.center {
            self.center_camera();
        }
        self.legend.refresh(&self.registry);
        Ok(added)
    }

    /// Resolves entity ids into visuals through the entity resolver and adds them.
    pub fn add_entities(&mut self, ids: &[EntityId], options: &AddOptions) -> Result<Vec<ObjectId>> {
        let resolver = self.entity_resolver.as_ref().ok_or_else(|| {
            ViewerError::InvalidInput("no entity resolver configured".to_string())
        })?;
        let visuals = resolver.resolve_entities(ids)?;
        log::debug!("resolved {} ids into {} visuals", ids.len(), visuals.len());
        self.add(visuals, options)
    }

    /// One colour per distinct new entity, applied to bodies and somata.
    fn apply_add_colors(&self, visuals: &mut [Visual], spec: &ColorSpec) -> Result<()> {
        let mut entities: Vec<EntityId> = Vec::new();
        for visual in visuals.iter() {
            if let Some(entity) = visual.entity_id() {
                if !entities.contains(entity) {
                    entities.push(entity.clone());
                }
            }
        }

        let colors: BTreeMap<EntityId, glam::Vec4> = match spec {
            ColorSpec::PerEntity(map) => {
                for color in map.values() {
                    neuroscope_core::color::validate_rgba(*color)?;
                }
                map.clone()
            }
            _ => {
                let resolved = self.colormaps.resolve_colormap(spec, entities.len())?;
                if resolved.len() != entities.len() {
                    return Err(ViewerError::SizeMismatch {
                        expected: entities.len(),
                        actual: resolved.len(),
                    });
                }
                entities.into_iter().zip(resolved).collect()
            }
        };

        for visual in visuals.iter_mut() {
            if !matches!(visual.part(), Part::Body | Part::Soma) {
                continue;
            }
            let color = visual.entity_id().and_then(|e| colors.get(e)).copied();
            if let Some(color) = color {
                visual.set_color(color);
            }
        }
        Ok(())
    }

    /// Detaches visuals by entity id or object id, refitting the camera to
    /// what is left if `center` is set. Returns how many were removed.
    pub fn remove(&mut self, selector: impl Into<Selector>, center: bool) -> usize {
        let selector = selector.into();
        let _block = self.events.block();
        let removed = self.registry.remove(&selector);
        if removed.is_empty() {
            log::warn!("nothing to remove for {selector:?}");
        } else {
            log::debug!("removed {} visuals", removed.len());
            if center {
                self.center_camera();
            }
        }
        self.legend.refresh(&self.registry);
        removed.len()
    }

    /// Detaches every visual.
    pub fn clear(&mut self) {
        let _block = self.events.block();
        let removed = self.registry.clear();
        self.legend.clear();
        self.active.clear();
        self.cycle.reset();
        log::debug!("cleared {removed} visuals");
    }

    /// Fits the camera to all attached visuals except the cursor.
    pub fn center_camera(&mut self) {
        if let Some((min, max)) = self.registry.scene_bounds() {
            self.camera.set_range(min, max);
        }
    }

    /// Fits the camera to the given visuals. Unknown ids are ignored.
    pub fn center_on(&mut self, objects: &[ObjectId]) {
        let visuals = objects.iter().filter_map(|id| self.registry.get(*id));
        match union_bounds(visuals) {
            Some((min, max)) => self.camera.set_range(min, max),
            None => log::debug!("nothing to center on"),
        }
    }

    /// Installs a named view (`"XY"`, `"-XZ"`, ...).
    pub fn set_view(&mut self, name: &str) -> Result<()> {
        let preset = ViewPreset::from_name(name)?;
        self.set_view_preset(preset);
        Ok(())
    }

    pub fn set_view_preset(&mut self, preset: ViewPreset) {
        self.camera.set_view(preset);
        log::debug!("view set to {preset}");
    }

    /// Restores the camera captured at construction.
    pub fn reset_camera(&mut self) {
        self.camera.set_state(self.default_camera);
    }

    /// Resizes the canvas and re-lays out overlay and legend.
    pub fn on_resize(&mut self, size: UVec2) {
        self.canvas.resize(size);
        self.camera.set_aspect_ratio(aspect_ratio(size));
        self.overlay.layout(size.as_vec2(), &self.options.rims);
        self.legend.refresh(&self.registry);
    }

    /// Feeds one frame duration to the FPS counter while it is shown.
    pub fn tick(&mut self, frame_time: std::time::Duration) {
        if !self.overlay.fps_visible() {
            return;
        }
        if let Some(fps) = self.fps.tick(frame_time) {
            self.overlay.set_fps(fps);
        }
    }
}
