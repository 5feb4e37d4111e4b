//! Scene configuration structures
//!
//! Settings for tessellation, shading and edge overlays. Serializable so a
//! shell can persist them alongside its own configuration.

use jig_core::Rgb;
use jig_core::constants::DEFAULT_TESSELLATION_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Surface shading model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Shading {
    /// Flat shading with one normal per triangle
    Flat,
    /// Physically based shading
    Pbr {
        /// Metallic factor (0..=1)
        metallic: f32,
        /// Roughness factor (0..=1)
        roughness: f32,
    },
}

impl Default for Shading {
    fn default() -> Self {
        Shading::Pbr {
            metallic: 0.0,
            roughness: 0.5,
        }
    }
}

/// Scene synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Tessellation tolerance passed to the kernel
    pub tessellation_tolerance: f64,
    /// Minimum angle between adjacent faces for a feature edge, in degrees
    pub feature_angle: f64,
    /// Surface shading
    pub shading: Shading,
    /// Color of edge overlays
    pub edge_color: Rgb,
    /// Line width of edge overlays
    pub edge_width: f32,
    /// Surface color for parts without a color
    pub default_color: Rgb,
    /// Number of cached meshes before the cache is cleared
    pub cache_capacity: usize,
    /// Viewport background
    pub background: Rgb,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tessellation_tolerance: DEFAULT_TESSELLATION_TOLERANCE,
            feature_angle: 20.0,
            shading: Shading::default(),
            edge_color: Rgb::new(0x11, 0x11, 0x11),
            edge_width: 3.0,
            default_color: Rgb::WHITE,
            cache_capacity: 100,
            background: Rgb::new(0xdc, 0xdc, 0xdc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.edge_color.to_hex(), "#111111");
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.tessellation_tolerance, DEFAULT_TESSELLATION_TOLERANCE);
        assert_eq!(
            config.shading,
            Shading::Pbr {
                metallic: 0.0,
                roughness: 0.5
            }
        );
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config: SceneConfig = ron::from_str("(feature_angle: 30.0, shading: Flat)").unwrap();
        assert_eq!(config.feature_angle, 30.0);
        assert_eq!(config.shading, Shading::Flat);
        assert_eq!(config.tessellation_tolerance, DEFAULT_TESSELLATION_TOLERANCE);
    }
}
