//! Permanent 2D overlay: shortcut help, status line and FPS readout.
//!
//! Text is not rasterised here; each line carries its anchor position and
//! an approximate screen rectangle so hosts can draw it and the picking pass
//! can treat it as a widget.

use std::time::Duration;

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::color::contrast_text_color;

/// Approximate glyph advance relative to the font size.
const GLYPH_ASPECT: f32 = 0.6;

/// Font size of the permanent overlay lines.
pub const OVERLAY_FONT_SIZE: f32 = 6.0;

/// Pixel margins between the canvas border and the overlay text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rims {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for Rims {
    fn default() -> Self {
        Self {
            left: 10.0,
            top: 20.0,
            right: 10.0,
            bottom: 15.0,
        }
    }
}

/// Axis-aligned rectangle in canvas pixels (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmplt(self.max).all()
    }
}

/// Which corner or edge of a text box its position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
}

/// Approximate bounding box of a single line of text.
#[must_use]
pub fn text_rect(text: &str, position: Vec2, anchor: TextAnchor, font_size: f32) -> ScreenRect {
    #[allow(clippy::cast_precision_loss)]
    let width = text.chars().count() as f32 * font_size * GLYPH_ASPECT;
    let height = font_size * 10.0 / 7.0;
    let min = match anchor {
        TextAnchor::TopLeft => position,
        TextAnchor::TopCenter => position - Vec2::new(width / 2.0, 0.0),
        TextAnchor::TopRight => position - Vec2::new(width, 0.0),
        TextAnchor::BottomLeft => position - Vec2::new(0.0, height),
    };
    ScreenRect::new(min, min + Vec2::new(width, height))
}

/// One permanent overlay line.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    pub text: String,
    pub position: Vec2,
    pub anchor: TextAnchor,
    pub visible: bool,
}

impl OverlayText {
    fn new(text: impl Into<String>, anchor: TextAnchor, visible: bool) -> Self {
        Self {
            text: text.into(),
            position: Vec2::ZERO,
            anchor,
            visible,
        }
    }

    /// Approximate screen rectangle.
    #[must_use]
    pub fn rect(&self) -> ScreenRect {
        text_rect(&self.text, self.position, self.anchor, OVERLAY_FONT_SIZE)
    }
}

/// Which overlay line a widget hit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayLine {
    Shortcuts,
    PickingHelp,
    Fps,
    Status,
}

/// The permanent overlay drawn on top of the 3D view.
#[derive(Debug, Clone)]
pub struct Overlay {
    visible: bool,
    text_color: Vec4,
    shortcuts: OverlayText,
    picking_help: OverlayText,
    fps: OverlayText,
    status: OverlayText,
}

impl Overlay {
    /// Creates the overlay with text colour contrasting the background.
    #[must_use]
    pub fn new(background: Vec3) -> Self {
        Self {
            visible: true,
            text_color: contrast_text_color(background),
            shortcuts: OverlayText::new(shortcuts_text(), TextAnchor::BottomLeft, true),
            picking_help: OverlayText::new(picking_help_text(), TextAnchor::BottomLeft, false),
            fps: OverlayText::new("FPS", TextAnchor::TopCenter, false),
            status: OverlayText::new("", TextAnchor::TopRight, true),
        }
    }

    /// Repositions every line for a canvas of the given size.
    pub fn layout(&mut self, size: Vec2, rims: &Rims) {
        self.shortcuts.position = Vec2::new(rims.left, size.y - rims.bottom);
        self.picking_help.position = Vec2::new(rims.left, size.y - rims.bottom - 10.0);
        self.fps.position = Vec2::new(size.x / 2.0, rims.top);
        self.status.position = Vec2::new(size.x - rims.right, rims.top);
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Flips overlay visibility and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    #[must_use]
    pub fn text_color(&self) -> Vec4 {
        self.text_color
    }

    /// Recomputes the text colour for a new background.
    pub fn set_background(&mut self, background: Vec3) {
        self.text_color = contrast_text_color(background);
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status.text
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status.text = text.into();
    }

    pub fn set_picking_help_visible(&mut self, visible: bool) {
        self.picking_help.visible = visible;
    }

    #[must_use]
    pub fn fps_visible(&self) -> bool {
        self.fps.visible
    }

    pub fn set_fps_visible(&mut self, visible: bool) {
        self.fps.visible = visible;
    }

    /// Displays a new FPS measurement.
    pub fn set_fps(&mut self, fps: f32) {
        self.fps.text = format!("{fps:.2} FPS");
    }

    #[must_use]
    pub fn line(&self, line: OverlayLine) -> &OverlayText {
        match line {
            OverlayLine::Shortcuts => &self.shortcuts,
            OverlayLine::PickingHelp => &self.picking_help,
            OverlayLine::Fps => &self.fps,
            OverlayLine::Status => &self.status,
        }
    }

    /// Lines currently drawn, empty while the overlay is hidden.
    pub fn visible_lines(&self) -> impl Iterator<Item = (OverlayLine, &OverlayText)> {
        [
            OverlayLine::Shortcuts,
            OverlayLine::PickingHelp,
            OverlayLine::Fps,
            OverlayLine::Status,
        ]
        .into_iter()
        .map(move |l| (l, self.line(l)))
        .filter(move |(_, t)| self.visible && t.visible && !t.text.is_empty())
    }
}

fn shortcuts_text() -> String {
    let items = [
        ("O", "toggle overlay"),
        ("L", "toggle legend"),
        ("P", "toggle picking"),
        ("Q/W", "cycle neurons"),
        ("U", "unhide all"),
        ("F", "show/hide FPS"),
        ("1", "XY"),
        ("2", "XZ"),
        ("3", "YZ"),
    ];
    format!("SHORTCUTS: {}", join_items(&items))
}

fn picking_help_text() -> String {
    let cursor_key = if cfg!(target_os = "macos") {
        "CMD+LMB"
    } else {
        "CTRL+LMB"
    };
    let items = [
        ("LMB @legend", "show/hide neuron"),
        ("SHIFT+LMB @neuron", "select neuron"),
        ("D", "deselect all"),
        ("H", "hide selected"),
        ("C", "url to cursor"),
        (cursor_key, "set cursor"),
    ];
    format!("PICKING: {}", join_items(&items))
}

fn join_items(items: &[(&str, &str)]) -> String {
    items
        .iter()
        .map(|(k, v)| format!("<{k}> {v}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Frame-rate meter reporting once per measurement window.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    elapsed: Duration,
    frames: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FpsCounter {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    /// Records one frame. Returns the rate once a full window has elapsed.
    pub fn tick(&mut self, frame_time: Duration) -> Option<f32> {
        self.frames += 1;
        self.elapsed += frame_time;
        if self.elapsed < self.window {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let fps = self.frames as f32 / self.elapsed.as_secs_f32();
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_anchors_to_rims() {
        let mut overlay = Overlay::new(Vec3::ZERO);
        overlay.layout(Vec2::new(800.0, 600.0), &Rims::default());
        assert_eq!(overlay.line(OverlayLine::Shortcuts).position, Vec2::new(10.0, 585.0));
        assert_eq!(overlay.line(OverlayLine::PickingHelp).position, Vec2::new(10.0, 575.0));
        assert_eq!(overlay.line(OverlayLine::Fps).position, Vec2::new(400.0, 20.0));
        assert_eq!(overlay.line(OverlayLine::Status).position, Vec2::new(790.0, 20.0));
    }

    #[test]
    fn test_visible_lines() {
        let mut overlay = Overlay::new(Vec3::ONE);
        assert_eq!(overlay.text_color(), Vec4::new(0.0, 0.0, 0.0, 1.0));
        let lines: Vec<_> = overlay.visible_lines().map(|(l, _)| l).collect();
        assert_eq!(lines, vec![OverlayLine::Shortcuts]);

        overlay.set_status("x");
        overlay.set_picking_help_visible(true);
        assert_eq!(overlay.visible_lines().count(), 3);

        overlay.toggle();
        assert_eq!(overlay.visible_lines().count(), 0);
    }

    #[test]
    fn test_shortcuts_text() {
        let overlay = Overlay::new(Vec3::ZERO);
        let text = &overlay.line(OverlayLine::Shortcuts).text;
        assert!(text.starts_with("SHORTCUTS: <O> toggle overlay | <L> toggle legend"));
        assert!(text.ends_with("<3> YZ"));
    }

    #[test]
    fn test_text_rect_anchors() {
        let r = text_rect("abcd", Vec2::new(100.0, 50.0), TextAnchor::TopRight, 7.0);
        assert!((r.max.x - 100.0).abs() < 1e-4);
        assert!((r.min.y - 50.0).abs() < 1e-4);
        assert!(r.contains(Vec2::new(95.0, 52.0)));
        assert!(!r.contains(Vec2::new(101.0, 52.0)));
    }

    #[test]
    fn test_fps_counter_reports_per_window() {
        let mut fps = FpsCounter::default();
        let frame = Duration::from_millis(250);
        assert_eq!(fps.tick(frame), None);
        assert_eq!(fps.tick(frame), None);
        assert_eq!(fps.tick(frame), None);
        let rate = fps.tick(frame).unwrap();
        assert!((rate - 4.0).abs() < 1e-4);
        assert_eq!(fps.tick(frame), None);
    }
}
