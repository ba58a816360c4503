//! Manifest loader - Discovers plugin manifests in a directory

use std::path::{Path, PathBuf};

use super::manifest::{PluginManifest, MANIFEST_FILE};
use crate::application::errors::{PluginError, PluginResult};

/// Scans `<plugin_dir>/<plugin>/plugin.yaml`
pub struct ManifestLoader {
    plugin_dir: PathBuf,
}

impl ManifestLoader {
    pub fn new(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
        }
    }

    /// Load the manifest of a single plugin directory
    pub fn load_manifest(&self, path: impl AsRef<Path>) -> PluginResult<PluginManifest> {
        let manifest_path = path.as_ref().join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(PluginError::Load(format!(
                "Missing {} in {}",
                MANIFEST_FILE,
                path.as_ref().display()
            )));
        }
        PluginManifest::from_file(&manifest_path)
    }

    /// Load every valid manifest, sorted by plugin id. Invalid ones are logged
    /// and skipped.
    pub fn load_all(&self) -> PluginResult<Vec<PluginManifest>> {
        let mut manifests = Vec::new();

        if !self.plugin_dir.exists() {
            tracing::warn!("Plugin directory does not exist: {}", self.plugin_dir.display());
            return Ok(manifests);
        }

        for entry in std::fs::read_dir(&self.plugin_dir)
            .map_err(|e| PluginError::Load(format!("Failed to read plugin directory: {}", e)))?
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            // Skip hidden directories
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    continue;
                }
            }

            match self.load_manifest(&path) {
                Ok(manifest) => manifests.push(manifest),
                Err(e) => {
                    tracing::warn!("Failed to load plugin from {}: {}", path.display(), e);
                }
            }
        }

        manifests.sort_by(|a, b| a.details.id.cmp(&b.details.id));
        Ok(manifests)
    }
}
