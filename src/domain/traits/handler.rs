use std::sync::Arc;

use super::Bot;
use crate::application::errors::CommandError;
use crate::domain::entities::{Channel, Command, Guild, Member, Message, PermissionRule, User};

/// Reply text produced by a handler, if any
pub type HandlerResult = Result<Option<String>, CommandError>;

/// Invocation from a guild text channel
pub struct GuildContext<'a> {
    pub message: &'a Message,
    pub author: &'a User,
    pub channel: &'a Channel,
    pub guild: &'a Guild,
    pub client: Option<Arc<dyn Bot>>,
    pub args: &'a [String],
}

/// Invocation from a direct or group conversation
pub struct DirectContext<'a> {
    pub message: &'a Message,
    pub author: &'a User,
    pub channel: &'a Channel,
    pub client: Option<Arc<dyn Bot>>,
    pub args: &'a [String],
}

/// Behaviour attached to a command. Every hook has a default, so an
/// implementation overrides only what it needs.
pub trait CommandHandler: Send + Sync {
    /// Called for messages sent in a guild channel
    fn on_guild_message(&self, _ctx: &GuildContext<'_>) -> HandlerResult {
        Ok(None)
    }

    /// Called for messages sent in a DM or group DM
    fn on_direct_message(&self, _ctx: &DirectContext<'_>) -> HandlerResult {
        Ok(None)
    }

    /// Decide whether `member` may run `command`. Open by default.
    fn check_authorization(&self, _member: &Member, _command: &Command) -> bool {
        true
    }
}

/// Closure-backed handler answering both guild and direct invocations
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&Message, &[String]) -> HandlerResult + Send + Sync + 'static,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&Message, &[String]) -> HandlerResult + Send + Sync + 'static,
{
    fn on_guild_message(&self, ctx: &GuildContext<'_>) -> HandlerResult {
        (self.func)(ctx.message, ctx.args)
    }

    fn on_direct_message(&self, ctx: &DirectContext<'_>) -> HandlerResult {
        (self.func)(ctx.message, ctx.args)
    }
}

/// Wrap a closure as a shareable handler
pub fn handler_fn<F>(func: F) -> Arc<dyn CommandHandler>
where
    F: Fn(&Message, &[String]) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(FnHandler::new(func))
}

/// Rule-based access check for handlers that want one.
///
/// The member must hold every named permission and, unless `@everyone` is
/// listed, at least one of the roles.
pub fn rules_allow(member: &Member, permissions: &[PermissionRule], roles: &[String]) -> bool {
    let permitted = permissions.iter().all(|rule| match rule {
        PermissionRule::Everyone => true,
        PermissionRule::Permission(name) => member.has_permission(name),
    });

    let in_role = roles.is_empty()
        || roles
            .iter()
            .any(|role| role == crate::domain::entities::options::EVERYONE || member.has_role(role));

    permitted && in_role
}
