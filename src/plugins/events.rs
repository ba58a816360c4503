//! Plugin lifecycle events and their observers

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const CLIENT_LOADED: &str = "client_loaded";
pub const COMMANDS_LOADED: &str = "commands_loaded";
pub const COMMAND_REGISTERED: &str = "command_registered";
pub const COMMAND_REMOVED: &str = "command_removed";

/// Something that happened to a plugin
#[derive(Debug, Clone, PartialEq)]
pub enum PluginEvent {
    ClientLoaded,
    CommandsLoaded { count: usize },
    CommandRegistered { id: String },
    CommandRemoved { id: String },
    /// Any event a plugin chooses to publish
    Custom { name: String, payload: serde_json::Value },
}

impl PluginEvent {
    pub fn name(&self) -> &str {
        match self {
            PluginEvent::ClientLoaded => CLIENT_LOADED,
            PluginEvent::CommandsLoaded { .. } => COMMANDS_LOADED,
            PluginEvent::CommandRegistered { .. } => COMMAND_REGISTERED,
            PluginEvent::CommandRemoved { .. } => COMMAND_REMOVED,
            PluginEvent::Custom { name, .. } => name,
        }
    }
}

/// Callback receiving the emitting plugin's id and the event
pub type Observer = Arc<dyn Fn(&str, &PluginEvent) + Send + Sync>;

/// Subscribers per event name, handed to a plugin when it is built
#[derive(Clone, Default)]
pub struct PluginObservers {
    subscribers: HashMap<String, Vec<Observer>>,
}

impl PluginObservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`PluginObservers::subscribe`]
    pub fn on<F>(mut self, event: impl Into<String>, observer: F) -> Self
    where
        F: Fn(&str, &PluginEvent) + Send + Sync + 'static,
    {
        self.subscribe(event, observer);
        self
    }

    pub fn subscribe<F>(&mut self, event: impl Into<String>, observer: F)
    where
        F: Fn(&str, &PluginEvent) + Send + Sync + 'static,
    {
        self.subscribers
            .entry(event.into())
            .or_default()
            .push(Arc::new(observer));
    }

    pub fn emit(&self, plugin_id: &str, event: &PluginEvent) {
        if let Some(observers) = self.subscribers.get(event.name()) {
            for observer in observers {
                observer(plugin_id, event);
            }
        }
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.get(event).map(Vec::len).unwrap_or(0)
    }
}

impl fmt::Debug for PluginObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .subscribers
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        f.debug_struct("PluginObservers").field("subscribers", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_emit_reaches_only_matching_subscribers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observers = PluginObservers::new()
            .on(COMMAND_REGISTERED, move |plugin, event| {
                sink.lock().unwrap().push(format!("{}:{}", plugin, event.name()));
            });

        observers.emit("music", &PluginEvent::CommandRegistered { id: "play".to_string() });
        observers.emit("music", &PluginEvent::ClientLoaded);

        assert_eq!(*seen.lock().unwrap(), vec!["music:command_registered".to_string()]);
        assert_eq!(observers.subscriber_count(COMMAND_REGISTERED), 1);
        assert_eq!(observers.subscriber_count(CLIENT_LOADED), 0);
    }

    #[test]
    fn test_custom_events_use_their_own_name() {
        let event = PluginEvent::Custom {
            name: "queue_full".to_string(),
            payload: serde_json::json!({ "size": 10 }),
        };
        assert_eq!(event.name(), "queue_full");
    }
}
