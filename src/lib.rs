//! cordwain - command and plugin registration for chat bots
//!
//! Bot authors declare commands (with aliases, permission checks and sub
//! command trees), bundle them into plugins, and let the dispatcher route
//! incoming messages to the right handler.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

pub use application::errors::{BotError, CommandError, ConfigError, PluginError};
pub use domain::entities::{Command, CommandOptions, Comparator, Message, SubCommand};
pub use plugins::{CommandLoader, Plugin, PluginDetails, PluginManager};
