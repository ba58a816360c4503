//! Plugin definition: metadata plus a keyed set of top-level commands

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::events::{PluginEvent, PluginObservers};
use crate::application::errors::{ConfigError, PluginError, PluginResult};
use crate::domain::entities::{Command, Message};
use crate::domain::traits::Bot;

const DETAIL_FIELDS: [&str; 5] = ["id", "name", "author", "version", "description"];

/// Required plugin metadata
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PluginDetails {
    pub id: String,
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
}

impl PluginDetails {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        author: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author: author.into(),
            version: version.into(),
            description: description.into(),
        }
    }

    /// Every field must be non-empty; the first failing one is reported
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [&self.id, &self.name, &self.author, &self.version, &self.description];
        for (field, value) in DETAIL_FIELDS.iter().zip(values) {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field.to_string()));
            }
        }
        Ok(())
    }

    /// Read details from an untyped object, e.g. a parsed manifest.
    ///
    /// All fields are checked for presence before any is checked for type.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let map = value
            .as_object()
            .ok_or_else(|| ConfigError::InvalidValue("PluginDetails must be an object".to_string()))?;

        for field in DETAIL_FIELDS {
            let present = match map.get(field) {
                None | Some(Value::Null) | Some(Value::Bool(false)) => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(Value::Number(n)) => n.as_f64() != Some(0.0),
                Some(_) => true,
            };
            if !present {
                return Err(ConfigError::MissingField(field.to_string()));
            }
        }

        let text = |field: &str| -> Result<String, ConfigError> {
            map.get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ConfigError::InvalidType(field.to_string()))
        };

        Ok(Self {
            id: text("id")?,
            name: text("name")?,
            author: text("author")?,
            version: text("version")?,
            description: text("description")?,
        })
    }
}

/// Populates a plugin's commands. Concrete plugins must override
/// `load_commands`; the default fails.
pub trait CommandLoader: Send + Sync {
    fn load_commands(&self, _plugin: &mut Plugin) -> PluginResult<()> {
        Err(PluginError::NotImplemented("load_commands"))
    }
}

/// A named, versioned bundle of commands
pub struct Plugin {
    details: PluginDetails,
    commands: HashMap<String, Command>,
    client: Option<Arc<dyn Bot>>,
    loader: Arc<dyn CommandLoader>,
    observers: PluginObservers,
}

impl Plugin {
    pub fn new(details: PluginDetails, loader: Arc<dyn CommandLoader>) -> PluginResult<Self> {
        Self::with_observers(details, loader, PluginObservers::new())
    }

    pub fn with_observers(
        details: PluginDetails,
        loader: Arc<dyn CommandLoader>,
        observers: PluginObservers,
    ) -> PluginResult<Self> {
        details.validate()?;
        Ok(Self {
            details,
            commands: HashMap::new(),
            client: None,
            loader,
            observers,
        })
    }

    pub fn id(&self) -> &str {
        &self.details.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn author(&self) -> &str {
        &self.details.author
    }

    pub fn version(&self) -> &str {
        &self.details.version
    }

    pub fn description(&self) -> &str {
        &self.details.description
    }

    pub fn details(&self) -> &PluginDetails {
        &self.details
    }

    pub fn client(&self) -> Option<Arc<dyn Bot>> {
        self.client.clone()
    }

    /// Run the plugin's command loader
    pub fn load_commands(&mut self) -> PluginResult<()> {
        let loader = Arc::clone(&self.loader);
        loader.load_commands(self)?;

        tracing::info!("Plugin '{}' loaded {} commands", self.id(), self.commands.len());
        self.emit(PluginEvent::CommandsLoaded { count: self.commands.len() });
        Ok(())
    }

    /// Store the client and hand it to the commands already registered
    pub fn load_client(&mut self, client: Arc<dyn Bot>) {
        for command in self.commands.values() {
            command.register(Some(Arc::clone(&client)));
        }
        self.client = Some(client);
        self.emit(PluginEvent::ClientLoaded);
    }

    /// Add a command unless one with the same id is already registered.
    /// Returns whether the command was added.
    pub fn register_command(&mut self, command: Command) -> bool {
        if self.commands.contains_key(command.id()) {
            tracing::warn!("Plugin '{}' already has a command '{}'", self.id(), command.id());
            return false;
        }

        command.register(self.client.clone());
        let id = command.id().to_string();
        self.commands.insert(id.clone(), command);
        self.emit(PluginEvent::CommandRegistered { id });
        true
    }

    /// Remove the command with the same id. Returns whether one was removed.
    pub fn remove_command(&mut self, command: &Command) -> bool {
        if self.commands.remove(command.id()).is_none() {
            return false;
        }
        self.emit(PluginEvent::CommandRemoved { id: command.id().to_string() });
        true
    }

    pub fn commands(&self) -> &HashMap<String, Command> {
        &self.commands
    }

    pub fn command(&self, id: &str) -> Option<&Command> {
        self.commands.get(id)
    }

    /// Top-level command invoked by `token`
    pub fn find_command(&self, token: &str, message: &Message) -> Option<Command> {
        self.commands
            .values()
            .find(|command| command.matches(token, message))
            .cloned()
    }

    /// Publish a named event to the observers subscribed to `name`
    pub fn emit_custom(&self, name: impl Into<String>, payload: Value) {
        self.emit(PluginEvent::Custom { name: name.into(), payload });
    }

    fn emit(&self, event: PluginEvent) {
        self.observers.emit(&self.details.id, &event);
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("details", &self.details)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("has_client", &self.client.is_some())
            .field("observers", &self.observers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::events::{COMMAND_REGISTERED, COMMAND_REMOVED};
    use serde_json::json;
    use std::sync::Mutex;

    struct Unimplemented;
    impl CommandLoader for Unimplemented {}

    struct Ping;
    impl CommandLoader for Ping {
        fn load_commands(&self, plugin: &mut Plugin) -> PluginResult<()> {
            plugin.register_command(Command::new("ping", None)?);
            Ok(())
        }
    }

    fn details() -> PluginDetails {
        PluginDetails::new("a", "n", "au", "1.0", "d")
    }

    #[test]
    fn test_empty_description_is_rejected() {
        let mut d = details();
        d.description = String::new();
        let err = Plugin::new(d, Arc::new(Ping)).unwrap_err();
        assert!(matches!(err, PluginError::Config(ConfigError::MissingField(ref f)) if f == "description"));
    }

    #[test]
    fn test_from_value_names_missing_field() {
        let err = PluginDetails::from_value(&json!({
            "id": "a", "author": "au", "version": "1.0", "description": "d"
        }))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingField("name".to_string()));
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_from_value_checks_presence_before_type() {
        let err = PluginDetails::from_value(&json!({
            "id": 7, "name": "n", "author": "au", "version": "1.0"
        }))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingField("description".to_string()));

        let err = PluginDetails::from_value(&json!({
            "id": 7, "name": "n", "author": "au", "version": "1.0", "description": "d"
        }))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidType("id".to_string()));
        assert_eq!(err.to_string(), "id must be a string");
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(matches!(
            PluginDetails::from_value(&json!("plugin")),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_load_commands_must_be_overridden() {
        let mut plugin = Plugin::new(details(), Arc::new(Unimplemented)).unwrap();
        let err = plugin.load_commands().unwrap_err();
        assert!(matches!(err, PluginError::NotImplemented("load_commands")));
        assert_eq!(err.to_string(), "load_commands must be overwritten");
    }

    #[test]
    fn test_load_commands_registers_ping() {
        let mut plugin = Plugin::new(details(), Arc::new(Ping)).unwrap();
        plugin.load_commands().unwrap();

        let ping = plugin.command("ping").unwrap();
        assert_eq!(ping.id(), "ping");
        assert_eq!(ping.usage(), "ping");
    }

    #[test]
    fn test_register_command_does_not_replace() {
        let mut plugin = Plugin::new(details(), Arc::new(Ping)).unwrap();
        let first = Command::new("ping", None).unwrap();
        let second = Command::new("ping", None).unwrap();

        assert!(plugin.register_command(first.clone()));
        assert!(!plugin.register_command(second));
        assert!(plugin.command("ping").unwrap().ptr_eq(&first));
        assert_eq!(plugin.commands().len(), 1);
    }

    #[test]
    fn test_remove_missing_command_is_noop() {
        let mut plugin = Plugin::new(details(), Arc::new(Ping)).unwrap();
        let ghost = Command::new("ghost", None).unwrap();
        assert!(!plugin.remove_command(&ghost));

        plugin.register_command(Command::new("ghost", None).unwrap());
        assert!(plugin.remove_command(&ghost));
        assert!(plugin.commands().is_empty());
    }

    #[test]
    fn test_observers_see_registrations() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (Arc::clone(&seen), Arc::clone(&seen));
        let observers = PluginObservers::new()
            .on(COMMAND_REGISTERED, move |_, event| a.lock().unwrap().push(event.clone()))
            .on(COMMAND_REMOVED, move |_, event| b.lock().unwrap().push(event.clone()));

        let mut plugin = Plugin::with_observers(details(), Arc::new(Ping), observers).unwrap();
        let cmd = Command::new("ping", None).unwrap();
        plugin.register_command(cmd.clone());
        plugin.remove_command(&cmd);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                PluginEvent::CommandRegistered { id: "ping".to_string() },
                PluginEvent::CommandRemoved { id: "ping".to_string() },
            ]
        );
    }

    #[test]
    fn test_custom_event_payload_reaches_subscriber() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observers = PluginObservers::new().on("queue_full", move |plugin, event| {
            if let PluginEvent::Custom { payload, .. } = event {
                sink.lock().unwrap().push((plugin.to_string(), payload.clone()));
            }
        });

        let plugin = Plugin::with_observers(details(), Arc::new(Ping), observers).unwrap();
        plugin.emit_custom("queue_full", json!({ "size": 10 }));
        plugin.emit_custom("queue_empty", json!({}));

        assert_eq!(*seen.lock().unwrap(), vec![("a".to_string(), json!({ "size": 10 }))]);
    }
}
