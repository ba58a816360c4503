//! Plugin manifest definition

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::application::errors::{PluginError, PluginResult};
use crate::plugins::PluginDetails;

pub const MANIFEST_FILE: &str = "plugin.yaml";

/// Plugin metadata read from disk
#[derive(Debug, Clone, PartialEq)]
pub struct PluginManifest {
    pub details: PluginDetails,
    /// Directory holding the manifest
    pub dir: PathBuf,
}

impl PluginManifest {
    pub fn from_file(path: impl AsRef<Path>) -> PluginResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PluginError::Load(format!("Failed to read manifest: {}", e)))?;

        let raw: Value = serde_yaml::from_str(&content)
            .map_err(|e| PluginError::Load(format!("Failed to parse manifest: {}", e)))?;

        Ok(Self {
            details: PluginDetails::from_value(&raw)?,
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        })
    }
}
