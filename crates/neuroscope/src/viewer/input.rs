//! Keyboard and mouse dispatch.

use glam::Vec2;
use neuroscope_core::options::normalize_key;
use neuroscope_core::{DimMode, EntityId, KeyAction, PickTarget, Result, ViewerError};

use super::Viewer;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    /// Control, or Command on macOS.
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
    };

    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl From<winit::keyboard::ModifiersState> for Modifiers {
    fn from(state: winit::keyboard::ModifiersState) -> Self {
        let command = cfg!(target_os = "macos") && state.super_key();
        Self {
            shift: state.shift_key(),
            control: state.control_key() || command,
            alt: state.alt_key(),
        }
    }
}

/// Mouse button of a press event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Left,
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

/// A key press carrying the typed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: char,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: char) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }
}

/// A mouse press at a canvas position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MousePress {
    pub position: Vec2,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl MousePress {
    pub fn left(position: Vec2, modifiers: Modifiers) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers,
        }
    }
}

/// Which rule, if any, a mouse press triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// The event was not handled (gate blocked, picking off, other button).
    Ignored,
    /// Nothing actionable under the cursor.
    NoAction,
    /// A legend label was clicked and its entity's visibility flipped.
    ToggledVisibility(EntityId),
    /// The cursor marker was placed; carries the lookup URL.
    CursorPlaced(String),
    /// An entity was shift-clicked.
    SelectionToggled { entity: EntityId, selected: bool },
}

impl Viewer {
    /// Handles a key press.
    ///
    /// Bound keys run their action; any other key goes to labeling mode.
    pub fn on_key_press(&mut self, event: &KeyPress) -> Result<()> {
        if self.events.is_blocked() {
            log::trace!("dropped key {:?} while events are blocked", event.key);
            return Ok(());
        }
        log::debug!("key pressed: {:?}", event.key);

        match self.options.keymap.action(event.key) {
            Some(action) => self.run_key_action(action),
            None => {
                self.apply_label(normalize_key(event.key));
                Ok(())
            }
        }
    }

    fn run_key_action(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::ToggleOverlay => {
                self.toggle_overlay();
            }
            KeyAction::ToggleLegend => self.set_show_legend(!self.show_legend()),
            KeyAction::ClearSelection => {
                self.clear_selection();
            }
            KeyAction::CyclePrevious => {
                self.cycle(-1);
            }
            KeyAction::CycleNext => {
                self.cycle(1);
            }
            KeyAction::HideSelected => {
                self.hide_selected();
            }
            KeyAction::UnhideAll => {
                let check_alpha = self.options.dim_mode == DimMode::Alpha;
                self.unhide(None, check_alpha);
            }
            KeyAction::ToggleFps => {
                self.toggle_fps();
            }
            KeyAction::TogglePicking => {
                self.toggle_picking();
            }
            KeyAction::SetView(preset) => self.set_view_preset(preset),
            KeyAction::OpenCursorUrl => match self.url_to_cursor(true) {
                Ok(_) => {}
                Err(ViewerError::CursorNotPlaced) => log::info!("must place cursor first"),
                Err(e) => return Err(e),
            },
        }
        Ok(())
    }

    /// Handles a mouse press while picking is enabled.
    ///
    /// Hits are visited nearest first; widgets are skipped and the first
    /// actionable hit fires exactly one rule:
    /// a legend label toggles its entity's visibility, Control snaps the
    /// cursor (Control+Shift also opens the lookup URL), Shift on an entity
    /// toggles its selection.
    pub fn on_mouse_press(&mut self, event: &MousePress) -> Result<PressOutcome> {
        if self.events.is_blocked() {
            log::trace!("dropped mouse press at {} while events are blocked", event.position);
            return Ok(PressOutcome::Ignored);
        }
        if !self.picking || event.button != MouseButton::Left {
            return Ok(PressOutcome::Ignored);
        }

        let hits = self.visuals_at(event.position + self.options.click_offset)?;
        log::debug!("mouse press at {}: {} hits", event.position, hits.len());
        if !event.modifiers.is_empty() {
            log::debug!("modifiers: {:?}", event.modifiers);
        }

        for hit in hits {
            match hit {
                PickTarget::Widget(_) => continue,
                PickTarget::LegendLabel {
                    object_id_ref,
                    entity_id,
                } => {
                    self.toggle_object(object_id_ref);
                    return Ok(PressOutcome::ToggledVisibility(entity_id));
                }
                PickTarget::Visual(object) => {
                    if event.modifiers.control {
                        let url =
                            self.snap_cursor(event.position, object, event.modifiers.shift)?;
                        return Ok(PressOutcome::CursorPlaced(url));
                    }
                    let entity = self
                        .registry
                        .get(object)
                        .and_then(|v| v.entity_id())
                        .cloned();
                    if let (true, Some(entity)) = (event.modifiers.shift, entity) {
                        let selected = self.toggle_select(&entity);
                        return Ok(PressOutcome::SelectionToggled { entity, selected });
                    }
                }
            }
        }
        Ok(PressOutcome::NoAction)
    }
}
