//! Commands shipped with the bot itself

use std::sync::Arc;

use crate::application::errors::PluginResult;
use crate::domain::entities::{Command, CommandOptions};
use crate::domain::traits::handler_fn;
use crate::plugins::plugin::{CommandLoader, Plugin, PluginDetails};

pub const CORE_PLUGIN_ID: &str = "core";

pub struct CoreCommands;

impl CommandLoader for CoreCommands {
    fn load_commands(&self, plugin: &mut Plugin) -> PluginResult<()> {
        let ping = Command::new("ping", Some(CommandOptions::default().with_description("Check the bot is alive")))?
            .with_handler(handler_fn(|_, _| Ok(Some("pong".to_string()))));
        ping.set_alias("p")?;
        plugin.register_command(ping);

        let echo = Command::new("echo", Some(CommandOptions::default().with_description("Repeat the given text")))?
            .with_handler(handler_fn(|_, args| {
                if args.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(args.join(" ")))
                }
            }));
        plugin.register_command(echo);

        let about = Command::new("about", Some(CommandOptions::default().with_description("Describe the bot")))?
            .with_handler(handler_fn(|_, _| {
                Ok(Some(format!("{} - a plugin based chat bot", env!("CARGO_PKG_NAME"))))
            }));
        let version = about.register_sub_command("version")?;
        version.set_handler(handler_fn(|_, _| {
            Ok(Some(format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))))
        }));
        version.set_alias("v")?;
        plugin.register_command(about);

        Ok(())
    }
}

/// The built-in plugin
pub fn core_plugin() -> PluginResult<Plugin> {
    Plugin::new(
        PluginDetails::new(
            CORE_PLUGIN_ID,
            "Core",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            "Built-in ping, echo and about commands",
        ),
        Arc::new(CoreCommands),
    )
}
