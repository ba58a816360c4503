//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Command construction and execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid command configuration: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Command '{0}' has no parent")]
    NoParent(String),

    #[error("Command '{id}' is already a sub command of '{parent}'")]
    AlreadyAttached { id: String, parent: String },

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Plugin lifecycle errors
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Invalid plugin details: {0}")]
    Config(#[from] ConfigError),

    #[error("{0} must be overwritten")]
    NotImplemented(&'static str),

    #[error("Plugin '{0}' already registered")]
    AlreadyRegistered(String),

    #[error("Plugin '{0}' not found")]
    NotFound(String),

    #[error("Plugin '{0}' is not enabled")]
    Disabled(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingField(String),

    #[error("{0} must be a string")]
    InvalidType(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type PluginResult<T> = Result<T, PluginError>;
