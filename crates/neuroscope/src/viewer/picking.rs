use glam::{Vec2, Vec3, Vec4};
use neuroscope_core::{
    EntityId, Geometry, ObjectId, Part, PickIndex, PickTarget, Result, ViewerError, Visual,
};
use neuroscope_render::{ring_order, CropRect, IdentityScene, Shape};

use super::Viewer;

const CURSOR_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

/// How far behind the cursor position its marker line starts.
const CURSOR_LENGTH: f32 = 10_000.0;

impl Viewer {
    /// Targets rendered around a canvas position, nearest first.
    ///
    /// Renders an identity pass of a small crop around `pos` and orders the
    /// ids found by concentric ring scan. The 3D view and overlay are made
    /// non-interactive for the duration of the pass and restored on every
    /// exit path.
    pub fn visuals_at(&mut self, pos: Vec2) -> Result<Vec<PickTarget>> {
        let _suspended = self.interactivity.suspend();

        let rims = &self.options.rims;
        let canvas_pos = pos - Vec2::new(rims.left, rims.top);
        #[allow(clippy::cast_precision_loss)]
        let framebuffer_pos = canvas_pos * self.canvas.pixel_scale() as f32;
        let crop = CropRect::centered(framebuffer_pos, self.options.picking_radius);

        let mut index = PickIndex::new();
        let mut scene = IdentityScene::new(&self.camera);
        // Drawn overlay lines occlude nothing but still show up as hits
        for (line, text) in self.overlay.visible_lines() {
            scene.push(index.register(PickTarget::Widget(line)), Shape::Screen(text.rect()));
        }
        for visual in self.registry.all_visuals() {
            if !visual.is_visible() || visual.part() == Part::Cursor {
                continue;
            }
            let id = index.register(PickTarget::Visual(visual.object_id()));
            scene.push(id, Shape::World(visual.geometry()));
        }
        // Legend labels live on the overlay
        let labels = if self.overlay.is_visible() {
            self.legend.labels()
        } else {
            Vec::new()
        };
        for label in labels {
            if !label.visible {
                continue;
            }
            let id = index.register(PickTarget::LegendLabel {
                object_id_ref: label.object_id_ref,
                entity_id: label.entity_id.clone(),
            });
            scene.push(id, Shape::Screen(label.rect()));
        }

        let buffer = self.canvas.render_identity(&scene, crop)?;
        let ids = ring_order(&buffer);
        log::debug!("picking at {pos}: crop {crop:?}, ids {ids:?}");
        Ok(index.resolve_all(&ids))
    }

    /// Scene visuals at a canvas position, nearest first.
    pub fn pick(&mut self, pos: Vec2) -> Result<Vec<ObjectId>> {
        Ok(self
            .visuals_at(pos)?
            .into_iter()
            .filter_map(|target| match target {
                PickTarget::Visual(id) => Some(id),
                _ => None,
            })
            .collect())
    }

    /// Places the cursor marker on the vertex of `object` closest to `click`
    /// on screen and returns the lookup URL for it, opening it if asked.
    pub fn snap_cursor(&mut self, click: Vec2, object: ObjectId, open: bool) -> Result<String> {
        let visual = self
            .registry
            .get(object)
            .ok_or_else(|| ViewerError::InvalidInput(format!("{object} is not in the scene")))?;

        let size = self.canvas.size();
        let nearest = visual
            .geometry()
            .vertices()
            .iter()
            .filter_map(|v| {
                let on_canvas = self.camera.project(*v, size)?;
                Some((*v, on_canvas.distance_squared(click)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(v, _)| v);
        let Some(position) = nearest else {
            return Err(ViewerError::InvalidInput(format!(
                "{object} has no vertex on screen"
            )));
        };
        self.cursor_entity = visual.entity_id().cloned();
        self.cursor_position = Some(position);
        log::debug!("world coordinates: {position}");

        self.place_cursor_marker(position)?;
        self.url_to_cursor(open)
    }

    /// Redraws the marker as a line towards `position` along the view direction.
    fn place_cursor_marker(&mut self, position: Vec3) -> Result<()> {
        let direction = (self.camera.center - position).normalize_or_zero();
        let start = position - direction * CURSOR_LENGTH;
        let geometry = Geometry::polyline(vec![start, position]);

        let existing = self.registry.cursors().first().map(|c| c.object_id());
        match existing.and_then(|id| self.registry.get_mut(id)) {
            Some(cursor) => cursor.set_geometry(geometry),
            None => {
                let cursor = Visual::new(Part::Cursor, geometry)
                    .with_name("cursor")
                    .with_color(CURSOR_COLOR);
                self.registry.add(cursor)?;
            }
        }
        Ok(())
    }

    /// Lookup URL for the cursor position, opened externally if `open`.
    pub fn url_to_cursor(&self, open: bool) -> Result<String> {
        let position = self.cursor_position.ok_or(ViewerError::CursorNotPlaced)?;
        let url = self.lookup.coordinate_to_url(
            position,
            self.options.lookup_precision,
            self.cursor_entity.as_ref(),
        );
        log::info!("URL: {url}");
        if open {
            self.opener.open(&url)?;
        }
        Ok(url)
    }

    /// Entity the cursor was last snapped onto.
    pub fn cursor_entity(&self) -> Option<&EntityId> {
        self.cursor_entity.as_ref()
    }
}
