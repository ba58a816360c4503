//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Plugins: Plugin manifests on disk
//! - Adapters: Platform clients (console)

pub mod config;
pub mod plugins;
pub mod adapters;
