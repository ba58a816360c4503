//! Plugin system
//! 
//! A plugin bundles top-level commands with metadata and publishes
//! lifecycle events to observers handed to it at construction.

pub mod builtin;
pub mod events;
pub mod manager;
pub mod plugin;

pub use events::{PluginEvent, PluginObservers};
pub use manager::{PluginInfo, PluginManager};
pub use plugin::{CommandLoader, Plugin, PluginDetails};
