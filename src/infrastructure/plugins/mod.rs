//! Plugin manifests on disk
//! 
//! Each plugin directory carries a `plugin.yaml` with the plugin's id, name,
//! author, version and description.

pub mod loader;
pub mod manifest;

pub use loader::ManifestLoader;
pub use manifest::PluginManifest;
