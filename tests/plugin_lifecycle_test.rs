//! Plugin Lifecycle Integration Tests
//! Run with: cargo test --test plugin_lifecycle_test

use std::sync::{Arc, Mutex};

use cordwain::application::errors::{ConfigError, PluginResult};
use cordwain::infrastructure::config::ClientOptions;
use cordwain::infrastructure::plugins::ManifestLoader;
use cordwain::plugins::events::{CLIENT_LOADED, COMMANDS_LOADED};
use cordwain::plugins::{PluginEvent, PluginObservers};
use cordwain::{Command, CommandLoader, Plugin, PluginDetails, PluginError, PluginManager};

struct PingPlugin;

impl CommandLoader for PingPlugin {
    fn load_commands(&self, plugin: &mut Plugin) -> PluginResult<()> {
        plugin.register_command(Command::new("ping", None)?);
        Ok(())
    }
}

#[test]
fn test_ping_plugin_end_to_end() {
    let details = PluginDetails::new("a", "n", "au", "1.0", "pings");
    let mut plugin = Plugin::new(details, Arc::new(PingPlugin)).unwrap();
    plugin.load_commands().unwrap();

    let ping = plugin.commands().get("ping").unwrap();
    assert_eq!(ping.id(), "ping");
    assert_eq!(ping.usage(), "ping");
}

#[test]
fn test_each_missing_field_is_named() {
    for field in ["id", "name", "author", "version", "description"] {
        let mut value = serde_json::json!({
            "id": "a", "name": "n", "author": "au", "version": "1.0", "description": "d"
        });
        value.as_object_mut().unwrap().remove(field);

        let err = PluginDetails::from_value(&value).unwrap_err();
        assert_eq!(err, ConfigError::MissingField(field.to_string()));
        assert_eq!(err.to_string(), format!("{} is required", field));
    }
}

#[test]
fn test_manager_emits_lifecycle_events() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (a, b) = (Arc::clone(&seen), Arc::clone(&seen));
    let observers = PluginObservers::new()
        .on(COMMANDS_LOADED, move |id, event| a.lock().unwrap().push((id.to_string(), event.clone())))
        .on(CLIENT_LOADED, move |id, event| b.lock().unwrap().push((id.to_string(), event.clone())));

    let details = PluginDetails::new("ping", "Ping", "au", "1.0", "pings");
    let plugin = Plugin::with_observers(details, Arc::new(PingPlugin), observers).unwrap();

    let mut manager = PluginManager::new(ClientOptions::default());
    manager.register(plugin).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![("ping".to_string(), PluginEvent::CommandsLoaded { count: 1 })]
    );
}

#[test]
fn test_manifest_directory_feeds_manager() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("ping");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("plugin.yaml"),
        "id: ping\nname: Ping\nauthor: someone\nversion: \"0.1.0\"\ndescription: Answers pings\n",
    )
    .unwrap();

    let manifests = ManifestLoader::new(root.path()).load_all().unwrap();
    assert_eq!(manifests.len(), 1);

    let mut manager = PluginManager::new(ClientOptions::default());
    for manifest in manifests {
        manager.register_manifest(manifest, Arc::new(PingPlugin)).unwrap();
    }
    assert!(manager.get("ping").unwrap().command("ping").is_some());

    let err = manager
        .register_manifest(
            ManifestLoader::new(root.path()).load_manifest(&dir).unwrap(),
            Arc::new(PingPlugin),
        )
        .unwrap_err();
    assert!(matches!(err, PluginError::AlreadyRegistered(_)));
}
