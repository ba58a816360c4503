//! Plugin manager - handles plugin lifecycle and command lookup

use crate::application::errors::{PluginError, PluginResult};
use crate::domain::entities::{Command, Message};
use crate::domain::traits::Bot;
use crate::infrastructure::config::ClientOptions;
use crate::infrastructure::plugins::PluginManifest;
use crate::plugins::plugin::{CommandLoader, Plugin};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Manages all plugins for the bot
pub struct PluginManager {
    plugins: HashMap<String, Plugin>,
    options: ClientOptions,
    client: Option<Arc<dyn Bot>>,
}

impl PluginManager {
    /// Create a new plugin manager with client options
    pub fn new(options: ClientOptions) -> Self {
        Self {
            plugins: HashMap::new(),
            options,
            client: None,
        }
    }

    /// Register a plugin: hand it the client, then load its commands
    pub fn register(&mut self, mut plugin: Plugin) -> PluginResult<()> {
        let id = plugin.id().to_string();

        if !self.options.is_plugin_enabled(&id) {
            warn!("Skipping disabled plugin: {}", id);
            return Err(PluginError::Disabled(id));
        }

        if self.plugins.contains_key(&id) {
            return Err(PluginError::AlreadyRegistered(id));
        }

        if let Some(client) = &self.client {
            plugin.load_client(Arc::clone(client));
        }
        plugin.load_commands()?;

        info!("Registered plugin: {} v{} by {}", plugin.name(), plugin.version(), plugin.author());
        self.plugins.insert(id, plugin);
        Ok(())
    }

    /// Unregister a plugin
    pub fn unregister(&mut self, id: &str) -> PluginResult<Plugin> {
        match self.plugins.remove(id) {
            Some(plugin) => {
                info!("Unregistered plugin: {}", id);
                Ok(plugin)
            }
            None => Err(PluginError::NotFound(id.to_string())),
        }
    }

    /// Attach the client to every plugin, now and for later registrations
    pub fn load_client(&mut self, client: Arc<dyn Bot>) {
        for plugin in self.plugins.values_mut() {
            plugin.load_client(Arc::clone(&client));
        }
        self.client = Some(client);
    }

    /// Build a plugin from a manifest and register it
    pub fn register_manifest(&mut self, manifest: PluginManifest, loader: Arc<dyn CommandLoader>) -> PluginResult<()> {
        tracing::debug!("Registering plugin from {}", manifest.dir.display());
        self.register(Plugin::new(manifest.details, loader)?)
    }

    pub fn client(&self) -> Option<Arc<dyn Bot>> {
        self.client.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Plugin> {
        self.plugins.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Plugin> {
        self.plugins.get_mut(id)
    }

    /// Check if a plugin exists
    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    /// List all registered plugins, sorted by id
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        let mut list: Vec<PluginInfo> = self
            .plugins
            .values()
            .map(|plugin| {
                let mut commands: Vec<String> = plugin.commands().keys().cloned().collect();
                commands.sort();
                PluginInfo {
                    id: plugin.id().to_string(),
                    name: plugin.name().to_string(),
                    version: plugin.version().to_string(),
                    description: plugin.description().to_string(),
                    commands,
                }
            })
            .collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    /// Every top-level command across plugins, sorted by id
    pub fn commands(&self) -> Vec<Command> {
        let mut all: Vec<Command> = self
            .plugins
            .values()
            .flat_map(|plugin| plugin.commands().values().cloned())
            .collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// Top-level command invoked by `token`, searched in plugin id order
    pub fn find_command(&self, token: &str, message: &Message) -> Option<(String, Command)> {
        let mut ids: Vec<&String> = self.plugins.keys().collect();
        ids.sort();
        ids.into_iter().find_map(|id| {
            self.plugins[id]
                .find_command(token, message)
                .map(|command| (id.clone(), command))
        })
    }

    /// Get client options
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }
}

/// Plugin information for listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub commands: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use crate::plugins::plugin::PluginDetails;
    use std::path::PathBuf;

    struct Loader(&'static [&'static str]);

    impl CommandLoader for Loader {
        fn load_commands(&self, plugin: &mut Plugin) -> PluginResult<()> {
            for id in self.0 {
                plugin.register_command(Command::new(*id, None)?);
            }
            Ok(())
        }
    }

    struct Broken;
    impl CommandLoader for Broken {}

    fn plugin(id: &str, commands: &'static [&'static str]) -> Plugin {
        Plugin::new(PluginDetails::new(id, id, "tester", "1.0.0", "test plugin"), Arc::new(Loader(commands))).unwrap()
    }

    #[test]
    fn test_register_and_list() {
        let mut manager = PluginManager::new(ClientOptions::default());
        manager.register(plugin("music", &["play", "stop"])).unwrap();
        manager.register(plugin("fun", &["roll"])).unwrap();

        let list = manager.list_plugins();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "fun");
        assert_eq!(list[1].commands, vec!["play".to_string(), "stop".to_string()]);
        assert_eq!(manager.commands().len(), 3);
    }

    #[test]
    fn test_duplicate_plugin_is_rejected() {
        let mut manager = PluginManager::new(ClientOptions::default());
        manager.register(plugin("music", &["play"])).unwrap();
        let err = manager.register(plugin("music", &["play"])).unwrap_err();
        assert!(matches!(err, PluginError::AlreadyRegistered(ref id) if id == "music"));
    }

    #[test]
    fn test_disabled_plugin_is_rejected() {
        let options = ClientOptions {
            enabled_plugins: vec!["music".to_string()],
            ..ClientOptions::default()
        };
        let mut manager = PluginManager::new(options);
        assert!(matches!(
            manager.register(plugin("fun", &["roll"])),
            Err(PluginError::Disabled(_))
        ));
        assert!(!manager.has_plugin("fun"));
    }

    #[test]
    fn test_loader_failure_keeps_plugin_out() {
        let mut manager = PluginManager::new(ClientOptions::default());
        let broken = Plugin::new(PluginDetails::new("x", "x", "a", "1", "d"), Arc::new(Broken)).unwrap();
        assert!(matches!(manager.register(broken), Err(PluginError::NotImplemented(_))));
        assert!(!manager.has_plugin("x"));
    }

    #[test]
    fn test_register_manifest() {
        let mut manager = PluginManager::new(ClientOptions::default());
        let manifest = PluginManifest {
            details: PluginDetails::new("fun", "Fun", "a", "1.0", "Games"),
            dir: PathBuf::from("plugins/fun"),
        };
        manager.register_manifest(manifest, Arc::new(Loader(&["roll"]))).unwrap();
        assert!(manager.get("fun").unwrap().command("roll").is_some());
    }

    #[test]
    fn test_find_and_unregister() {
        let mut manager = PluginManager::new(ClientOptions::default());
        manager.register(plugin("music", &["play"])).unwrap();
        let message = Message::direct(User::new("1"), "/play");

        let (plugin_id, command) = manager.find_command("play", &message).unwrap();
        assert_eq!(plugin_id, "music");
        assert_eq!(command.id(), "play");

        manager.unregister("music").unwrap();
        assert!(manager.find_command("play", &message).is_none());
        assert!(matches!(manager.unregister("music"), Err(PluginError::NotFound(_))));
    }
}
