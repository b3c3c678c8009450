//! Named camera orientations.

use std::fmt;
use std::str::FromStr;

use glam::Quat;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Canonical axis-aligned views and their inverted variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewPreset {
    #[serde(rename = "XY")]
    Xy,
    #[serde(rename = "XZ")]
    Xz,
    #[serde(rename = "YZ")]
    Yz,
    #[serde(rename = "-XY")]
    NegXy,
    #[serde(rename = "-XZ")]
    NegXz,
    #[serde(rename = "-YZ")]
    NegYz,
}

impl ViewPreset {
    /// All presets, positive views first.
    pub const ALL: [ViewPreset; 6] = [
        ViewPreset::Xy,
        ViewPreset::Xz,
        ViewPreset::Yz,
        ViewPreset::NegXy,
        ViewPreset::NegXz,
        ViewPreset::NegYz,
    ];

    /// Parses `"XY"`, `"-XZ"` and so on (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, ViewerError> {
        match name.trim().to_uppercase().as_str() {
            "XY" => Ok(ViewPreset::Xy),
            "XZ" => Ok(ViewPreset::Xz),
            "YZ" => Ok(ViewPreset::Yz),
            "-XY" => Ok(ViewPreset::NegXy),
            "-XZ" => Ok(ViewPreset::NegXz),
            "-YZ" => Ok(ViewPreset::NegYz),
            _ => Err(ViewerError::UnknownView(name.to_string())),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ViewPreset::Xy => "XY",
            ViewPreset::Xz => "XZ",
            ViewPreset::Yz => "YZ",
            ViewPreset::NegXy => "-XY",
            ViewPreset::NegXz => "-XZ",
            ViewPreset::NegYz => "-YZ",
        }
    }

    /// Camera orientation installed by this preset.
    #[must_use]
    pub fn orientation(self) -> Quat {
        let (x, y, z, w) = match self {
            ViewPreset::Xy => (0.0, 0.0, 0.0, 1.0),
            ViewPreset::NegXy => (1.0, 0.0, 0.0, 0.0),
            ViewPreset::Xz => (-0.75, 0.0, 0.0, -0.65),
            ViewPreset::NegXz => (-0.4, 0.0, 0.0, 1.0),
            ViewPreset::Yz => (0.5, 0.5, -0.4, 0.6),
            ViewPreset::NegYz => (-0.5, 0.5, -0.5, -0.5),
        };
        Quat::from_xyzw(x, y, z, w).normalize()
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewPreset {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
