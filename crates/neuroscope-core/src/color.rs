//! Colour specifications and parsing.
//!
//! Colours are stored as linear RGBA [`Vec4`] with components in `[0, 1]`.

use std::collections::BTreeMap;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::visual::EntityId;

/// Neutral gray used for legend entries of hidden entities.
pub const LEGEND_HIDDEN_GRAY: Vec4 = Vec4::new(0.3, 0.3, 0.3, 1.0);

/// A caller-supplied colour request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpec {
    /// One colour for every entity.
    Single(Vec4),
    /// A colour name (`"red"`, `"#ff8800"`) or a palette name (`"hls"`, `"viridis"`).
    Named(String),
    /// Explicit colours, one per entity in order. Reused cyclically if short.
    List(Vec<Vec4>),
    /// Explicit colours keyed by entity.
    PerEntity(BTreeMap<EntityId, Vec4>),
}

impl From<Vec4> for ColorSpec {
    fn from(color: Vec4) -> Self {
        Self::Single(color)
    }
}

impl From<Vec3> for ColorSpec {
    fn from(color: Vec3) -> Self {
        Self::Single(color.extend(1.0))
    }
}

impl From<&str> for ColorSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

/// Parses a colour name or hex string into RGBA.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and a small set of CSS/matplotlib
/// names including single-letter shorthands.
pub fn parse_color(text: &str) -> Result<Vec4> {
    let trimmed = text.trim().to_lowercase();
    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ViewerError::InvalidColor(text.to_string()));
    }

    let rgb = match trimmed.as_str() {
        "r" | "red" => Vec3::new(1.0, 0.0, 0.0),
        "g" | "green" => Vec3::new(0.0, 0.5, 0.0),
        "lime" => Vec3::new(0.0, 1.0, 0.0),
        "b" | "blue" => Vec3::new(0.0, 0.0, 1.0),
        "c" | "cyan" => Vec3::new(0.0, 0.75, 0.75),
        "m" | "magenta" => Vec3::new(0.75, 0.0, 0.75),
        "y" | "yellow" => Vec3::new(0.75, 0.75, 0.0),
        "k" | "black" => Vec3::ZERO,
        "w" | "white" => Vec3::ONE,
        "gray" | "grey" => Vec3::splat(0.5),
        "orange" => Vec3::new(1.0, 0.647, 0.0),
        "purple" => Vec3::new(0.5, 0.0, 0.5),
        "brown" => Vec3::new(0.647, 0.165, 0.165),
        "pink" => Vec3::new(1.0, 0.753, 0.796),
        _ => return Err(ViewerError::InvalidColor(text.to_string())),
    };
    Ok(rgb.extend(1.0))
}

fn parse_hex(hex: &str) -> Option<Vec4> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| f32::from(v) / 255.0);
    match hex.len() {
        3 => {
            let mut out = [0.0; 3];
            for (i, c) in hex.chars().enumerate() {
                let doubled: String = [c, c].iter().collect();
                out[i] = channel(&doubled)?;
            }
            Some(Vec4::new(out[0], out[1], out[2], 1.0))
        }
        6 | 8 => {
            let r = channel(hex.get(0..2)?)?;
            let g = channel(hex.get(2..4)?)?;
            let b = channel(hex.get(4..6)?)?;
            let a = if hex.len() == 8 {
                channel(hex.get(6..8)?)?
            } else {
                1.0
            };
            Some(Vec4::new(r, g, b, a))
        }
        _ => None,
    }
}

/// Checks that every component of a colour lies in `[0, 1]`.
pub fn validate_rgba(color: Vec4) -> Result<Vec4> {
    if color.to_array().iter().all(|c| (0.0..=1.0).contains(c)) {
        Ok(color)
    } else {
        Err(ViewerError::InvalidColor(format!("{color:?}")))
    }
}

/// HSV "value" of an RGB colour (its largest component).
#[must_use]
pub fn hsv_value(rgb: Vec3) -> f32 {
    rgb.max_element()
}

/// Foreground text colour that contrasts with the given background.
#[must_use]
pub fn contrast_text_color(background: Vec3) -> Vec4 {
    Vec3::splat(1.0 - hsv_value(background)).extend(1.0)
}

/// Alpha used for de-emphasised entities in alpha dim mode.
///
/// Dim visuals stay faintly visible on light backgrounds and nearly
/// invisible on dark ones.
#[must_use]
pub fn dim_alpha(background: Vec3) -> f32 {
    0.05 + 0.2 * hsv_value(background)
}

/// Simple HSV to RGB conversion helper.
#[allow(
    clippy::many_single_char_names,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match (h * 6.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Vec3::new(r + m, g + m, b + m)
}
