//! Persisted application configuration

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

/// Window size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Last camera pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: DVec3,
    pub focal_point: DVec3,
    pub up: DVec3,
}

/// Configuration loaded at startup and written at shutdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: Option<CameraPose>,
}

impl AppConfig {
    /// Load from a RON file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Save to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Configuration file errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("config.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.window.width, 1280);
        assert!(config.camera.is_none());
    }

    #[test]
    fn test_save_and_load_camera() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        let config = AppConfig {
            window: WindowConfig {
                width: 1600,
                height: 900,
            },
            camera: Some(CameraPose {
                position: DVec3::new(300.0, -300.0, 300.0),
                focal_point: DVec3::ZERO,
                up: DVec3::Z,
            }),
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "not ron at all {").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Deserialize(_))
        ));
    }
}
