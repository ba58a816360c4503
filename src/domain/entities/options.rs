//! Command options and their defaults

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use super::Comparator;
use crate::application::errors::CommandError;
use crate::domain::merge::merge_defaults;

pub const EVERYONE: &str = "@everyone";

static DEFAULT_OPTIONS: Lazy<Value> = Lazy::new(|| {
    json!({
        "caseSensitive": true,
        "dmOnly": false,
        "guildOnly": false,
        "description": "Default Description",
        "permissions": [EVERYONE],
        "roles": [EVERYONE],
    })
});

/// A permission requirement attached to a command
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PermissionRule {
    /// Anyone may run the command
    Everyone,
    /// A named platform permission, e.g. `MANAGE_MESSAGES`
    Permission(String),
}

impl From<String> for PermissionRule {
    fn from(value: String) -> Self {
        if value == EVERYONE {
            PermissionRule::Everyone
        } else {
            PermissionRule::Permission(value)
        }
    }
}

impl From<&str> for PermissionRule {
    fn from(value: &str) -> Self {
        PermissionRule::from(value.to_string())
    }
}

impl From<PermissionRule> for String {
    fn from(rule: PermissionRule) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for PermissionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionRule::Everyone => write!(f, "{}", EVERYONE),
            PermissionRule::Permission(name) => write!(f, "{}", name),
        }
    }
}

/// Options accepted when building a command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOptions {
    pub case_sensitive: bool,
    pub dm_only: bool,
    /// Ignored when `dm_only` is set
    pub guild_only: bool,
    pub description: String,
    pub permissions: Vec<PermissionRule>,
    pub roles: Vec<String>,
    #[serde(skip)]
    pub comparator: Option<Comparator>,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            dm_only: false,
            guild_only: false,
            description: "Default Description".to_string(),
            permissions: vec![PermissionRule::Everyone],
            roles: vec![EVERYONE.to_string()],
            comparator: None,
        }
    }
}

impl CommandOptions {
    /// Build options from a partial, untyped object such as a config section.
    /// Keys left out fall back to their defaults.
    pub fn from_value(given: Option<Value>) -> Result<Self, CommandError> {
        let merged = merge_defaults(&DEFAULT_OPTIONS, given);
        serde_json::from_value(merged).map_err(|e| CommandError::Configuration(e.to_string()))
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    pub fn dm_only(mut self, value: bool) -> Self {
        self.dm_only = value;
        self
    }

    pub fn guild_only(mut self, value: bool) -> Self {
        self.guild_only = value;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_permission(mut self, rule: impl Into<PermissionRule>) -> Self {
        self.permissions.retain(|p| *p != PermissionRule::Everyone);
        self.permissions.push(rule.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.retain(|r| r != EVERYONE);
        self.roles.push(role.into());
        self
    }

    pub fn with_comparator(mut self, comparator: impl Into<Comparator>) -> Self {
        self.comparator = Some(comparator.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value_none_matches_default() {
        let options = CommandOptions::from_value(None).unwrap();
        let defaults = CommandOptions::default();

        assert_eq!(options.case_sensitive, defaults.case_sensitive);
        assert_eq!(options.dm_only, defaults.dm_only);
        assert_eq!(options.guild_only, defaults.guild_only);
        assert_eq!(options.description, defaults.description);
        assert_eq!(options.permissions, defaults.permissions);
        assert_eq!(options.roles, defaults.roles);
    }

    #[test]
    fn test_from_value_partial() {
        let options = CommandOptions::from_value(Some(json!({
            "dmOnly": true,
            "permissions": ["MANAGE_MESSAGES"],
        })))
        .unwrap();

        assert!(options.dm_only);
        assert!(options.case_sensitive);
        assert_eq!(options.description, "Default Description");
        assert_eq!(
            options.permissions,
            vec![PermissionRule::Permission("MANAGE_MESSAGES".to_string())]
        );
    }

    #[test]
    fn test_from_value_rejects_wrong_types() {
        let err = CommandOptions::from_value(Some(json!({ "dmOnly": "yes" }))).unwrap_err();
        assert!(matches!(err, CommandError::Configuration(_)));
    }

    #[test]
    fn test_permission_rule_strings() {
        assert_eq!(PermissionRule::from("@everyone"), PermissionRule::Everyone);
        assert_eq!(PermissionRule::from("KICK").to_string(), "KICK");
    }

    #[test]
    fn test_builder_replaces_everyone() {
        let options = CommandOptions::default()
            .with_permission("BAN_MEMBERS")
            .with_role("Moderator");

        assert_eq!(options.permissions, vec![PermissionRule::Permission("BAN_MEMBERS".to_string())]);
        assert_eq!(options.roles, vec!["Moderator".to_string()]);
    }
}
