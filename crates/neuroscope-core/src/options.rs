//! Configuration options for the viewer.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::cycle::DimMode;
use crate::error::Result;
use crate::legend::DEFAULT_LEGEND_FONT_SIZE;
use crate::overlay::Rims;
use crate::selection::DEFAULT_HIGHLIGHT;
use crate::view::ViewPreset;

/// An action bound to a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    ToggleOverlay,
    ToggleLegend,
    ClearSelection,
    CyclePrevious,
    CycleNext,
    HideSelected,
    UnhideAll,
    ToggleFps,
    TogglePicking,
    SetView(ViewPreset),
    OpenCursorUrl,
}

/// Character to action table. Lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keymap {
    bindings: BTreeMap<char, KeyAction>,
}

impl Default for Keymap {
    fn default() -> Self {
        let bindings = [
            ('o', KeyAction::ToggleOverlay),
            ('l', KeyAction::ToggleLegend),
            ('d', KeyAction::ClearSelection),
            ('q', KeyAction::CyclePrevious),
            ('w', KeyAction::CycleNext),
            ('h', KeyAction::HideSelected),
            ('u', KeyAction::UnhideAll),
            ('f', KeyAction::ToggleFps),
            ('p', KeyAction::TogglePicking),
            ('1', KeyAction::SetView(ViewPreset::Xy)),
            ('2', KeyAction::SetView(ViewPreset::Xz)),
            ('3', KeyAction::SetView(ViewPreset::Yz)),
            ('!', KeyAction::SetView(ViewPreset::NegXy)),
            ('@', KeyAction::SetView(ViewPreset::NegXz)),
            ('£', KeyAction::SetView(ViewPreset::NegYz)),
            ('#', KeyAction::SetView(ViewPreset::NegYz)),
            ('c', KeyAction::OpenCursorUrl),
        ]
        .into_iter()
        .collect();
        Self { bindings }
    }
}

impl Keymap {
    /// A keymap with no bindings.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Action bound to a character, if any.
    #[must_use]
    pub fn action(&self, key: char) -> Option<KeyAction> {
        self.bindings.get(&normalize_key(key)).copied()
    }

    #[must_use]
    pub fn is_bound(&self, key: char) -> bool {
        self.action(key).is_some()
    }

    /// Binds a key, replacing any previous binding.
    pub fn bind(&mut self, key: char, action: KeyAction) {
        self.bindings.insert(normalize_key(key), action);
    }

    pub fn unbind(&mut self, key: char) -> Option<KeyAction> {
        self.bindings.remove(&normalize_key(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, KeyAction)> + '_ {
        self.bindings.iter().map(|(k, a)| (*k, *a))
    }
}

/// Lowercases single-character keys; multi-char lowercase forms are kept as is.
#[must_use]
pub fn normalize_key(key: char) -> char {
    let mut lower = key.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(c), None) => c,
        _ => key,
    }
}

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Canvas background colour.
    pub background_color: Vec3,

    /// Colour displayed on selected entities.
    pub highlight_color: Vec4,

    /// Edge length in pixels of the identity-pass crop around a click.
    pub picking_radius: u32,

    /// Offset added to mouse positions before picking.
    pub click_offset: Vec2,

    /// Margins between the canvas border and overlay text.
    pub rims: Rims,

    pub legend_font_size: f32,

    /// Whether the legend is shown at startup.
    pub show_legend: bool,

    /// Whether mouse picking is enabled at startup.
    pub picking: bool,

    /// How cycling de-emphasises non-focal entities.
    pub dim_mode: DimMode,

    /// Precision argument forwarded to the coordinate lookup.
    pub lookup_precision: u32,

    pub keymap: Keymap,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            background_color: Vec3::ZERO,
            highlight_color: DEFAULT_HIGHLIGHT,
            picking_radius: 20,
            click_offset: Vec2::new(15.0, 15.0),
            rims: Rims::default(),
            legend_font_size: DEFAULT_LEGEND_FONT_SIZE,
            show_legend: false,
            picking: false,
            dim_mode: DimMode::Alpha,
            lookup_precision: 5,
            keymap: Keymap::default(),
        }
    }
}

impl ViewerOptions {
    /// Loads options from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let options = serde_json::from_str(&text)?;
        log::debug!("loaded viewer options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Writes options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_is_case_insensitive() {
        let keymap = Keymap::default();
        assert_eq!(keymap.action('O'), Some(KeyAction::ToggleOverlay));
        assert_eq!(keymap.action('w'), Some(KeyAction::CycleNext));
        assert_eq!(
            keymap.action('£'),
            Some(KeyAction::SetView(ViewPreset::NegYz))
        );
        assert_eq!(keymap.action('x'), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        let mut options = ViewerOptions::default();
        options.picking_radius = 32;
        options.dim_mode = DimMode::Hide;
        options.keymap.bind('x', KeyAction::ToggleFps);
        options.save(&path).unwrap();

        let loaded = ViewerOptions::load(&path).unwrap();
        assert_eq!(loaded, options);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: ViewerOptions =
            serde_json::from_str(r#"{"picking": true, "dim_mode": "hide"}"#).unwrap();
        assert!(options.picking);
        assert_eq!(options.dim_mode, DimMode::Hide);
        assert_eq!(options.picking_radius, 20);
        assert_eq!(options.keymap, Keymap::default());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(ViewerOptions::load("/nonexistent/viewer.json").is_err());
    }
}
