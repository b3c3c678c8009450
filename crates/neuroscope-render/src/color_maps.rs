//! Color maps and categorical palettes.
//!
//! [`ColorMapRegistry`] resolves colour specifications for batches of
//! entities: single colours are repeated, lists are reused cyclically and
//! names are tried as a colour first, then as a palette or colour map.

use std::collections::HashMap;

use glam::{Vec3, Vec4};
use neuroscope_core::color::{hsv_to_rgb, parse_color, validate_rgba};
use neuroscope_core::{ColorSpec, ColormapResolver, Result, ViewerError};

/// A color map for mapping scalar values to colors.
#[derive(Debug, Clone)]
pub struct ColorMap {
    /// Color map name.
    pub name: String,
    /// Color samples (evenly spaced from 0 to 1).
    pub colors: Vec<Vec3>,
}

impl ColorMap {
    /// Creates a new color map.
    pub fn new(name: impl Into<String>, colors: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Samples `count` evenly spaced colours across the map.
    pub fn sample_n(&self, count: usize) -> Vec<Vec3> {
        match count {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..count)
                .map(|i| self.sample(i as f32 / (count - 1) as f32))
                .collect(),
        }
    }

    /// Samples the color map at a given value (0 to 1).
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);

        if self.colors.is_empty() {
            return Vec3::ZERO;
        }

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let n = self.colors.len() - 1;
        let idx = (t * n as f32).floor() as usize;
        let idx = idx.min(n - 1);
        let frac = t * n as f32 - idx as f32;

        self.colors[idx].lerp(self.colors[idx + 1], frac)
    }
}

/// Registry for managing color maps.
#[derive(Default)]
pub struct ColorMapRegistry {
    color_maps: HashMap<String, ColorMap>,
}

impl ColorMapRegistry {
    /// Creates a new color map registry with default color maps.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        // Viridis color map
        self.register(ColorMap::new(
            "viridis",
            vec![
                Vec3::new(0.267, 0.004, 0.329),
                Vec3::new(0.282, 0.140, 0.457),
                Vec3::new(0.253, 0.265, 0.529),
                Vec3::new(0.206, 0.371, 0.553),
                Vec3::new(0.163, 0.471, 0.558),
                Vec3::new(0.127, 0.566, 0.550),
                Vec3::new(0.134, 0.658, 0.517),
                Vec3::new(0.266, 0.749, 0.440),
                Vec3::new(0.477, 0.821, 0.318),
                Vec3::new(0.741, 0.873, 0.150),
                Vec3::new(0.993, 0.906, 0.144),
            ],
        ));

        // Blues color map
        self.register(ColorMap::new(
            "blues",
            vec![
                Vec3::new(0.969, 0.984, 1.000),
                Vec3::new(0.871, 0.922, 0.969),
                Vec3::new(0.776, 0.859, 0.937),
                Vec3::new(0.620, 0.792, 0.882),
                Vec3::new(0.419, 0.682, 0.839),
                Vec3::new(0.259, 0.573, 0.776),
                Vec3::new(0.129, 0.443, 0.710),
                Vec3::new(0.031, 0.318, 0.612),
                Vec3::new(0.031, 0.188, 0.420),
            ],
        ));

        // Reds color map
        self.register(ColorMap::new(
            "reds",
            vec![
                Vec3::new(1.000, 0.961, 0.941),
                Vec3::new(0.996, 0.878, 0.824),
                Vec3::new(0.988, 0.733, 0.631),
                Vec3::new(0.988, 0.573, 0.447),
                Vec3::new(0.984, 0.416, 0.290),
                Vec3::new(0.937, 0.231, 0.173),
                Vec3::new(0.796, 0.094, 0.114),
                Vec3::new(0.647, 0.059, 0.082),
                Vec3::new(0.404, 0.000, 0.051),
            ],
        ));

        // Coolwarm color map
        self.register(ColorMap::new(
            "coolwarm",
            vec![
                Vec3::new(0.230, 0.299, 0.754),
                Vec3::new(0.552, 0.690, 0.996),
                Vec3::new(0.866, 0.866, 0.866),
                Vec3::new(0.956, 0.604, 0.486),
                Vec3::new(0.706, 0.016, 0.150),
            ],
        ));

        // Rainbow color map
        self.register(ColorMap::new(
            "rainbow",
            vec![
                Vec3::new(0.5, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
        ));
    }

    /// Registers a color map.
    pub fn register(&mut self, color_map: ColorMap) {
        self.color_maps.insert(color_map.name.clone(), color_map);
    }

    /// Gets a color map by name.
    pub fn get(&self, name: &str) -> Option<&ColorMap> {
        self.color_maps.get(name)
    }

    /// `count` colours from a named palette or colour map.
    ///
    /// `"hls"` gives evenly spaced hues; any registered colour map is
    /// sampled evenly across its range.
    pub fn palette(&self, name: &str, count: usize) -> Result<Vec<Vec4>> {
        let key = name.trim().to_lowercase();
        if key == "hls" || key == "husl" {
            return Ok(hls_palette(count));
        }
        let map = self
            .get(&key)
            .ok_or_else(|| ViewerError::UnknownColorMap(name.to_string()))?;
        Ok(map.sample_n(count).into_iter().map(|c| c.extend(1.0)).collect())
    }
}

impl ColormapResolver for ColorMapRegistry {
    fn resolve_colormap(&self, spec: &ColorSpec, count: usize) -> Result<Vec<Vec4>> {
        match spec {
            ColorSpec::Single(color) => Ok(vec![validate_rgba(*color)?; count]),
            ColorSpec::List(colors) => {
                if colors.is_empty() {
                    return Err(ViewerError::InvalidColor("empty color list".to_string()));
                }
                for color in colors {
                    validate_rgba(*color)?;
                }
                Ok(colors.iter().copied().cycle().take(count).collect())
            }
            ColorSpec::Named(name) => match parse_color(name) {
                Ok(color) => Ok(vec![color; count]),
                Err(_) => self.palette(name, count),
            },
            ColorSpec::PerEntity(_) => Err(ViewerError::InvalidInput(
                "per-entity colors must be applied by entity id".to_string(),
            )),
        }
    }
}

/// `count` colours with evenly spaced hues at fixed lightness and saturation.
pub fn hls_palette(count: usize) -> Vec<Vec4> {
    (0..count)
        .map(|i| {
            let hue = 0.01 + i as f32 / count as f32;
            hsv_to_rgb(hue, 0.65, 0.85).extend(1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints() {
        let registry = ColorMapRegistry::new();
        let viridis = registry.get("viridis").unwrap();
        assert_eq!(viridis.sample(0.0), Vec3::new(0.267, 0.004, 0.329));
        assert_eq!(viridis.sample(1.0), Vec3::new(0.993, 0.906, 0.144));
        assert_eq!(viridis.sample_n(3).len(), 3);
    }

    #[test]
    fn test_hls_palette_is_distinct() {
        let colors = hls_palette(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert!((*a - *b).length() > 0.1);
            }
        }
    }

    #[test]
    fn test_resolve_specs() {
        let registry = ColorMapRegistry::new();
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);

        let single = registry.resolve_colormap(&ColorSpec::Single(red), 3).unwrap();
        assert_eq!(single, vec![red; 3]);

        let named = registry.resolve_colormap(&"red".into(), 2).unwrap();
        assert_eq!(named, vec![red; 2]);

        let list = registry
            .resolve_colormap(&ColorSpec::List(vec![red, Vec4::ONE]), 3)
            .unwrap();
        assert_eq!(list, vec![red, Vec4::ONE, red]);

        assert_eq!(registry.resolve_colormap(&"hls".into(), 4).unwrap().len(), 4);
        assert_eq!(registry.resolve_colormap(&"Viridis".into(), 5).unwrap().len(), 5);
    }

    #[test]
    fn test_resolve_errors() {
        let registry = ColorMapRegistry::new();
        assert!(matches!(
            registry.resolve_colormap(&"no-such-map".into(), 2),
            Err(ViewerError::UnknownColorMap(_))
        ));
        assert!(registry.resolve_colormap(&ColorSpec::List(vec![]), 2).is_err());
        assert!(registry
            .resolve_colormap(&ColorSpec::Single(Vec4::new(2.0, 0.0, 0.0, 1.0)), 1)
            .is_err());
    }
}
