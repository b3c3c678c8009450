use std::path::Path;

use image::RgbaImage;
use neuroscope_core::Result;
use neuroscope_render::{save_image, FrameScene, ScreenshotOptions, Shape};

use super::Viewer;

impl Viewer {
    /// Renders the current frame at `options.pixel_scale` times the canvas size.
    pub fn render_image(&mut self, options: &ScreenshotOptions) -> Result<RgbaImage> {
        let alpha = if options.transparent_background { 0.0 } else { 1.0 };
        let mut scene = FrameScene::new(&self.camera, self.options.background_color.extend(alpha));

        for visual in self.registry.all_visuals() {
            if visual.is_visible() {
                scene.push(visual.color(), Shape::World(visual.geometry()));
            }
        }
        if self.overlay.is_visible() {
            let text_color = self.overlay.text_color();
            for (_, text) in self.overlay.visible_lines() {
                scene.push(text_color, Shape::Screen(text.rect()));
            }
            for label in self.legend.labels() {
                if label.visible {
                    scene.push(label.color, Shape::Screen(label.rect()));
                }
            }
        }

        log::trace!("rendering frame with {} items", scene.items.len());
        Ok(self.canvas.render_frame(&scene, options.pixel_scale)?)
    }

    /// Renders the current frame and writes it to `path` (PNG or JPEG).
    ///
    /// With `hide_overlay` the overlay is hidden for the capture; its
    /// previous visibility is restored whether or not rendering succeeds.
    pub fn screenshot(&mut self, path: impl AsRef<Path>, options: &ScreenshotOptions) -> Result<()> {
        let previous = self.overlay.is_visible();
        if options.hide_overlay {
            self.overlay.set_visible(false);
        }
        let rendered = self.render_image(options);
        self.overlay.set_visible(previous);

        save_image(path, &rendered?)?;
        Ok(())
    }
}
