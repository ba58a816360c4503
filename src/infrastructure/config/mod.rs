//! Configuration management

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::domain::merge::merge_defaults;

/// Bot configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub client: ClientOptions,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    /// Own user id; used for mention prefixes and self-bot filtering
    pub user_id: Option<String>,
}

/// Options for the client hosting the plugins
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientOptions {
    pub prefix: String,
    pub guild_configs: bool,
    /// Only react to messages sent by the bot's own account
    pub self_bot: bool,
    pub default_help: bool,
    /// Plugin ids to load; empty means all
    pub enabled_plugins: Vec<String>,
    pub plugins_dir: PathBuf,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            prefix: "/".to_string(),
            guild_configs: false,
            self_bot: false,
            default_help: true,
            enabled_plugins: Vec::new(),
            plugins_dir: PathBuf::from("./plugins"),
        }
    }
}

impl ClientOptions {
    pub fn is_plugin_enabled(&self, id: &str) -> bool {
        self.enabled_plugins.is_empty() || self.enabled_plugins.iter().any(|p| p == id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "cordwain".to_string(),
                user_id: None,
            },
            client: ClientOptions::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// Parse a possibly partial YAML document; missing or empty keys keep
    /// their defaults
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut given: Value = if content.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?
        };
        strip_nulls(&mut given);

        let defaults = serde_json::to_value(Config::default())
            .map_err(|e| ConfigError::Parse(format!("Failed to encode defaults: {}", e)))?;

        serde_json::from_value(merge_defaults(&defaults, Some(given)))
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load_env() -> Self {
        Config::default().with_env()
    }

    /// Apply `BOT_PREFIX` and `BOT_PLUGINS_DIR` overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            if !prefix.is_empty() {
                self.client.prefix = prefix;
            }
        }

        if let Ok(dir) = std::env::var("BOT_PLUGINS_DIR") {
            self.client.plugins_dir = PathBuf::from(dir);
        }

        self
    }
}

/// Drop null-valued keys so a bare `client:` reads as absent
fn strip_nulls(value: &mut Value) {
    if let Value::Object(map) = value {
        map.retain(|_, v| !v.is_null());
        map.values_mut().for_each(strip_nulls);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("client:\n  prefix: \"!\"\n  enabled-plugins: [music]\n").unwrap();

        assert_eq!(config.client.prefix, "!");
        assert_eq!(config.client.enabled_plugins, vec!["music".to_string()]);
        assert!(config.client.default_help);
        assert!(!config.client.self_bot);
        assert_eq!(config.bot.name, "cordwain");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_empty_sections_keep_defaults() {
        let config = Config::from_yaml("bot:\n  name: helper\nclient:\n").unwrap();
        assert_eq!(config.bot.name, "helper");
        assert_eq!(config.client, ClientOptions::default());

        let config = Config::from_yaml("client:\n  prefix:\n  self-bot: true\n").unwrap();
        assert_eq!(config.client.prefix, "/");
        assert!(config.client.self_bot);
    }

    #[test]
    fn test_bad_types_are_reported() {
        let err = Config::from_yaml("client:\n  self-bot: sometimes\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), Config::default());
    }

    #[test]
    fn test_enabled_plugins() {
        let mut options = ClientOptions::default();
        assert!(options.is_plugin_enabled("anything"));
        options.enabled_plugins = vec!["core".to_string()];
        assert!(options.is_plugin_enabled("core"));
        assert!(!options.is_plugin_enabled("music"));
    }
}
