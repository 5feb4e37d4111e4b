//! Parameter records
//!
//! Parameters are a flat `name -> number` mapping stored as JSON. Required
//! dimensions are never defaulted: a missing key fails the rebuild.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};

/// Named numeric parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, f64>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a required parameter
    pub fn get(&self, key: &str) -> BuildResult<f64> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| BuildError::MissingParameter(key.to_string()))
    }

    /// Value if present
    pub fn try_get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Set a value, returning the previous one
    pub fn set(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(key.into(), value)
    }

    /// Builder-style set
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse from a JSON object
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        serde_json::from_str(json).map_err(|e| ParamsError::Deserialize(e.to_string()))
    }

    /// Load from a JSON file; a missing file is an error
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ParamsError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ParamsError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ParamsError::Io(e.to_string()))?;
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Presentation metadata for one parameter
///
/// Plain data for the shell; `build` does not enforce the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

impl ParamSpec {
    pub const fn new(key: &'static str, label: &'static str, min: f64, max: f64) -> Self {
        Self {
            key,
            label,
            min,
            max,
        }
    }

    /// Check whether a value lies within the suggested range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Parameter file errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamsError {
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
    fn test_missing_key_is_named() {
        let params = Params::new().with("wall", 8.0);
        assert_eq!(params.get("wall").unwrap(), 8.0);
        assert!(matches!(
            params.get("tablet_w"),
            Err(BuildError::MissingParameter(ref key)) if key == "tablet_w"
        ));
    }

    #[test]
    fn test_load_flat_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{ "tablet_w": 327, "visor_angle": 20.5 }"#).unwrap();

        let params = Params::load(&path).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("tablet_w").unwrap(), 327.0);
        assert_eq!(params.get("visor_angle").unwrap(), 20.5);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Params::load(dir.path().join("absent.json")),
            Err(ParamsError::Io(_))
        ));
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        assert!(Params::from_json(r#"{ "wall": "thick" }"#).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let params: Params = [("a", 1.0), ("b", 2.5)].into_iter().collect();
        params.save(&path).unwrap();
        assert_eq!(Params::load(&path).unwrap(), params);
    }
}
