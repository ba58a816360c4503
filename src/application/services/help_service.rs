use crate::domain::entities::Command;
use crate::plugins::PluginManager;

/// Renders the built-in `help` command
pub struct HelpService {
    prefix: String,
}

impl HelpService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Help for one command path (`["about", "version"]`), or a listing of
    /// every top-level command when `path` is empty
    pub fn get_help(&self, manager: &PluginManager, path: &[String]) -> String {
        let Some((first, rest)) = path.split_first() else {
            return self.list_commands(manager);
        };

        let Some(mut command) = manager.commands().into_iter().find(|c| c.id() == first || c.names().contains(first)) else {
            return format!("Command {}{} not found", self.prefix, first);
        };

        for token in rest {
            match command.sub_command(token).or_else(|| command.sub_command_alias(token)) {
                Some(sub) => command = sub,
                None => break,
            }
        }

        self.describe(&command)
    }

    fn list_commands(&self, manager: &PluginManager) -> String {
        let mut help = "Available commands:\n".to_string();
        for cmd in manager.commands() {
            help.push_str(&format!("  {}{} - {}\n", self.prefix, cmd.id(), cmd.description()));
        }
        help.push_str(&format!("  {}help [command] - Show this message\n", self.prefix));
        help
    }

    fn describe(&self, cmd: &Command) -> String {
        let mut help = format!("{}{} - {}", self.prefix, cmd.usage(), cmd.description());

        let names = cmd.names();
        if !names.is_empty() {
            help.push_str(&format!("\nAliases: {}", names.join(", ")));
        }

        if cmd.dm_only() {
            help.push_str("\nOnly available in direct messages");
        } else if cmd.guild_only() {
            help.push_str("\nOnly available in servers");
        }

        let subs = cmd.sub_commands();
        if !subs.is_empty() {
            help.push_str("\nSub commands:");
            for sub in subs {
                help.push_str(&format!("\n  {}{} - {}", self.prefix, sub.usage(), sub.description()));
            }
        }
        help
    }
}
