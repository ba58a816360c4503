use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use super::{Comparator, CommandOptions, Member, Message, PermissionRule};
use crate::application::errors::CommandError;
use crate::domain::traits::{Bot, CommandHandler, DirectContext, GuildContext, HandlerResult};

/// Represents a bot command.
///
/// `Command` is a cheap handle: clones share the same underlying command.
/// A parent owns its sub commands, while a sub command only keeps a weak
/// link back to its parent.
#[derive(Clone)]
pub struct Command {
    inner: Arc<CommandInner>,
}

struct CommandInner {
    id: String,
    case_sensitive: bool,
    dm_only: bool,
    guild_only: bool,
    description: String,
    permissions: Vec<PermissionRule>,
    roles: Vec<String>,
    state: RwLock<CommandState>,
}

struct CommandState {
    usage: String,
    names: Vec<String>,
    comparator: Comparator,
    parent: Option<Weak<CommandInner>>,
    sub_commands: HashMap<String, Command>,
    sub_command_aliases: HashMap<String, Command>,
    handler: Option<Arc<dyn CommandHandler>>,
    client: Option<Arc<dyn Bot>>,
}

/// What to register as a sub command
pub enum SubCommand {
    /// An already built command, attached as is
    Existing(Command),
    /// A new command built from an id
    Id {
        id: String,
        handler: Option<Arc<dyn CommandHandler>>,
        options: Option<CommandOptions>,
    },
}

impl SubCommand {
    pub fn id(id: impl Into<String>) -> Self {
        SubCommand::Id {
            id: id.into(),
            handler: None,
            options: None,
        }
    }

    pub fn with_handler(id: impl Into<String>, handler: Arc<dyn CommandHandler>, options: Option<CommandOptions>) -> Self {
        SubCommand::Id {
            id: id.into(),
            handler: Some(handler),
            options,
        }
    }
}

impl From<Command> for SubCommand {
    fn from(command: Command) -> Self {
        SubCommand::Existing(command)
    }
}

impl From<&str> for SubCommand {
    fn from(id: &str) -> Self {
        SubCommand::id(id)
    }
}

impl From<String> for SubCommand {
    fn from(id: String) -> Self {
        SubCommand::id(id)
    }
}

/// One alias or several
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aliases {
    One(String),
    Many(Vec<String>),
}

impl Aliases {
    fn into_vec(self) -> Vec<String> {
        match self {
            Aliases::One(alias) => vec![alias],
            Aliases::Many(aliases) => aliases,
        }
    }
}

impl From<&str> for Aliases {
    fn from(alias: &str) -> Self {
        Aliases::One(alias.to_string())
    }
}

impl From<String> for Aliases {
    fn from(alias: String) -> Self {
        Aliases::One(alias)
    }
}

impl From<Vec<String>> for Aliases {
    fn from(aliases: Vec<String>) -> Self {
        Aliases::Many(aliases)
    }
}

impl From<Vec<&str>> for Aliases {
    fn from(aliases: Vec<&str>) -> Self {
        Aliases::Many(aliases.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Aliases {
    fn from(aliases: [&str; N]) -> Self {
        Aliases::Many(aliases.iter().map(|a| a.to_string()).collect())
    }
}

impl Command {
    /// Build a top-level command. Options left as `None` use the defaults.
    pub fn new(id: impl Into<String>, options: Option<CommandOptions>) -> Result<Self, CommandError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CommandError::Configuration("command id must be a non-empty string".to_string()));
        }

        let options = options.unwrap_or_default();
        let comparator = options
            .comparator
            .unwrap_or_else(|| Comparator::Text(id.clone()))
            .folded(options.case_sensitive);

        Ok(Self {
            inner: Arc::new(CommandInner {
                // dm_only wins over guild_only
                guild_only: !options.dm_only && options.guild_only,
                dm_only: options.dm_only,
                case_sensitive: options.case_sensitive,
                description: options.description,
                permissions: options.permissions,
                roles: options.roles,
                state: RwLock::new(CommandState {
                    usage: id.clone(),
                    names: Vec::new(),
                    comparator,
                    parent: None,
                    sub_commands: HashMap::new(),
                    sub_command_aliases: HashMap::new(),
                    handler: None,
                    client: None,
                }),
                id,
            }),
        })
    }

    pub fn with_handler(self, handler: Arc<dyn CommandHandler>) -> Self {
        self.set_handler(handler);
        self
    }

    pub fn set_handler(&self, handler: Arc<dyn CommandHandler>) {
        self.write().handler = Some(handler);
    }

    fn read(&self) -> RwLockReadGuard<'_, CommandState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CommandState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn case_sensitive(&self) -> bool {
        self.inner.case_sensitive
    }

    pub fn dm_only(&self) -> bool {
        self.inner.dm_only
    }

    pub fn guild_only(&self) -> bool {
        self.inner.guild_only
    }

    pub fn description(&self) -> &str {
        &self.inner.description
    }

    pub fn roles(&self) -> &[String] {
        &self.inner.roles
    }

    /// Configured permissions, or `@everyone` when none were given
    pub fn permissions(&self) -> Vec<PermissionRule> {
        if self.inner.permissions.is_empty() {
            vec![PermissionRule::Everyone]
        } else {
            self.inner.permissions.clone()
        }
    }

    /// `parent usage + " " + id` for sub commands, the bare id otherwise
    pub fn usage(&self) -> String {
        self.read().usage.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.read().names.clone()
    }

    pub fn comparator(&self) -> Comparator {
        self.read().comparator.clone()
    }

    pub fn parent(&self) -> Option<Command> {
        self.read()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Command { inner })
    }

    pub fn client(&self) -> Option<Arc<dyn Bot>> {
        self.read().client.clone()
    }

    pub fn ptr_eq(&self, other: &Command) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether `token` invokes this command
    pub fn matches(&self, token: &str, message: &Message) -> bool {
        self.read().comparator.matches(token, message, self.inner.case_sensitive)
    }

    /// Register a sub command and return its handle.
    ///
    /// Both entry paths set the parent link and derive the usage from this
    /// command. A command already attached elsewhere is rejected.
    pub fn register_sub_command(&self, sub: impl Into<SubCommand>) -> Result<Command, CommandError> {
        let child = match sub.into() {
            SubCommand::Existing(command) => command,
            SubCommand::Id { id, handler, options } => {
                let command = Command::new(id, options)?;
                if let Some(handler) = handler {
                    command.set_handler(handler);
                }
                command
            }
        };

        if self.is_or_descends_from(&child) {
            return Err(CommandError::InvalidArgument(format!(
                "command '{}' cannot be a sub command of itself or of '{}'",
                child.id(),
                self.usage()
            )));
        }

        if let Some(parent) = child.parent() {
            if !parent.ptr_eq(self) {
                return Err(CommandError::AlreadyAttached {
                    id: child.id().to_string(),
                    parent: parent.id().to_string(),
                });
            }
        }

        {
            let mut state = child.write();
            state.parent = Some(Arc::downgrade(&self.inner));
            state.client = self.client();
        }
        child.derive_usage(format!("{} {}", self.usage(), child.id()));

        tracing::debug!("Registered sub command '{}' on '{}'", child.id(), self.id());
        self.write().sub_commands.insert(child.id().to_string(), child.clone());
        Ok(child)
    }

    /// Whether `other` is this command or one of its ancestors
    fn is_or_descends_from(&self, other: &Command) -> bool {
        let mut current = Some(self.clone());
        while let Some(command) = current {
            if command.ptr_eq(other) {
                return true;
            }
            current = command.parent();
        }
        false
    }

    /// Set the usage and re-derive it down the subtree
    fn derive_usage(&self, usage: String) {
        let subs = {
            let mut state = self.write();
            state.usage = usage.clone();
            state.sub_commands.values().cloned().collect::<Vec<_>>()
        };
        for sub in subs {
            sub.derive_usage(format!("{} {}", usage, sub.id()));
        }
    }

    /// Map `alias` to `sub_command`. A later call with the same alias wins.
    pub fn set_sub_alias(&self, sub_command: &Command, alias: impl Into<String>) {
        self.write().sub_command_aliases.insert(alias.into(), sub_command.clone());
    }

    /// Add one or more aliases to this command.
    ///
    /// Sub commands register their aliases on the parent; top-level commands
    /// extend their own comparator. Aliases already present are skipped.
    pub fn set_alias(&self, alias: impl Into<Aliases>) -> Result<(), CommandError> {
        let aliases = alias.into().into_vec();
        if let Some(bad) = aliases.iter().find(|a| a.trim().is_empty()) {
            return Err(CommandError::InvalidArgument(format!(
                "alias must be a non-empty string, got {:?}",
                bad
            )));
        }

        let parent = self.parent();
        let mut added = Vec::new();
        {
            let mut state = self.write();
            for alias in aliases {
                let alias = if self.inner.case_sensitive { alias } else { alias.to_lowercase() };
                if state.names.contains(&alias) {
                    continue;
                }
                state.names.push(alias.clone());
                if parent.is_none() {
                    state.comparator.push_alias(alias.clone());
                }
                added.push(alias);
            }
        }

        if let Some(parent) = parent {
            for alias in &added {
                parent.set_sub_alias(self, alias.clone());
            }
        }

        if !added.is_empty() {
            tracing::debug!("Added aliases {:?} to '{}'", added, self.usage());
        }
        Ok(())
    }

    /// Aliases this command holds on its parent
    pub fn aliases(&self) -> Result<Vec<String>, CommandError> {
        let parent = self
            .parent()
            .ok_or_else(|| CommandError::NoParent(self.id().to_string()))?;

        let mut aliases: Vec<String> = parent
            .read()
            .sub_command_aliases
            .iter()
            .filter(|(_, command)| command.ptr_eq(self))
            .map(|(alias, _)| alias.clone())
            .collect();
        aliases.sort();
        Ok(aliases)
    }

    pub fn sub_command(&self, id: &str) -> Option<Command> {
        self.read().sub_commands.get(id).cloned()
    }

    pub fn sub_commands(&self) -> Vec<Command> {
        let mut subs: Vec<Command> = self.read().sub_commands.values().cloned().collect();
        subs.sort_by(|a, b| a.id().cmp(b.id()));
        subs
    }

    pub fn sub_command_alias(&self, alias: &str) -> Option<Command> {
        self.read().sub_command_aliases.get(alias).cloned()
    }

    /// Find the sub command invoked by `token`, by alias first and then by
    /// each sub command's comparator
    pub fn resolve_sub_command(&self, token: &str, message: &Message) -> Option<Command> {
        let state = self.read();
        if let Some(found) = state.sub_command_aliases.get(token) {
            return Some(found.clone());
        }
        let lowered = token.to_lowercase();
        if let Some(found) = state
            .sub_command_aliases
            .get(&lowered)
            .filter(|command| !command.case_sensitive())
        {
            return Some(found.clone());
        }
        state
            .sub_commands
            .values()
            .find(|command| command.matches(token, message))
            .cloned()
    }

    /// Attach the client. Always overwrites, and reaches every sub command.
    pub fn register(&self, client: Option<Arc<dyn Bot>>) {
        let subs = {
            let mut state = self.write();
            state.client = client.clone();
            state.sub_commands.values().cloned().collect::<Vec<_>>()
        };
        for sub in subs {
            sub.register(client.clone());
        }
    }

    pub fn check_authorization(&self, member: &Member) -> bool {
        let handler = self.read().handler.clone();
        match handler {
            Some(handler) => handler.check_authorization(member, self),
            None => true,
        }
    }

    pub fn on_guild_message(&self, ctx: &GuildContext<'_>) -> HandlerResult {
        let handler = self.read().handler.clone();
        match handler {
            Some(handler) => handler.on_guild_message(ctx),
            None => Ok(None),
        }
    }

    pub fn on_direct_message(&self, ctx: &DirectContext<'_>) -> HandlerResult {
        let handler = self.read().handler.clone();
        match handler {
            Some(handler) => handler.on_direct_message(ctx),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("Command")
            .field("id", &self.inner.id)
            .field("usage", &state.usage)
            .field("names", &state.names)
            .field("comparator", &state.comparator)
            .field("sub_commands", &state.sub_commands.keys().collect::<Vec<_>>())
            .finish()
    }
}
