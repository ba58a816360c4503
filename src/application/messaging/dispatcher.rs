//! Message dispatcher - Routes messages to command handlers

use super::parser::MessageParser;
use crate::application::errors::BotError;
use crate::application::services::HelpService;
use crate::domain::entities::{ChannelKind, Command, Message};
use crate::domain::traits::{DirectContext, GuildContext};
use crate::infrastructure::config::ClientOptions;
use crate::plugins::PluginManager;

/// What happened to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a command, or from an author the bot does not listen to
    Ignored,
    /// Prefixed, but no command matched the token
    NotFound(String),
    /// The command exists but not for this kind of channel
    WrongChannel { usage: String, channel: ChannelKind },
    /// The member failed the command's authorization check
    Unauthorized(String),
    /// A handler ran
    Handled { usage: String, reply: Option<String> },
}

/// Message dispatcher - matches commands and enforces channel and
/// permission rules before calling handlers
pub struct MessageDispatcher {
    parser: MessageParser,
    help: Option<HelpService>,
    self_bot: bool,
    bot_user_id: Option<String>,
}

impl MessageDispatcher {
    pub fn new(options: &ClientOptions) -> Self {
        Self {
            parser: MessageParser::new(&options.prefix),
            help: options.default_help.then(|| HelpService::new(&options.prefix)),
            self_bot: options.self_bot,
            bot_user_id: None,
        }
    }

    /// Set the bot's own user id, enabling mention prefixes
    pub fn with_bot_user(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.parser = MessageParser::new(self.parser.prefix()).with_bot_user(id.clone());
        self.bot_user_id = Some(id);
        self
    }

    fn listens_to(&self, message: &Message) -> bool {
        if self.self_bot {
            self.bot_user_id.as_deref() == Some(message.author.id.as_str())
        } else {
            !message.author.is_bot
        }
    }

    /// Route a message to its command and run the matching hook
    pub fn dispatch(&self, manager: &PluginManager, message: &Message) -> Result<DispatchOutcome, BotError> {
        self.route(manager, message).map(|(outcome, _)| outcome)
    }

    /// Dispatch, then send any reply through the client
    pub async fn handle(&self, manager: &PluginManager, message: &Message) -> Result<DispatchOutcome, BotError> {
        let (outcome, command) = self.route(manager, message)?;

        if let DispatchOutcome::Handled { usage, reply: Some(reply) } = &outcome {
            let client = command.and_then(|c| c.client()).or_else(|| manager.client());
            match client {
                Some(client) => {
                    client.send_message(&message.channel.id, reply).await?;
                }
                None => tracing::warn!("No client to deliver reply for '{}'", usage),
            }
        }

        Ok(outcome)
    }

    fn route(&self, manager: &PluginManager, message: &Message) -> Result<(DispatchOutcome, Option<Command>), BotError> {
        if !self.listens_to(message) {
            return Ok((DispatchOutcome::Ignored, None));
        }
        let Some(parsed) = self.parser.parse(&message.content) else {
            return Ok((DispatchOutcome::Ignored, None));
        };

        let Some((plugin_id, top)) = manager.find_command(&parsed.name, message) else {
            if let Some(help) = self.help.as_ref().filter(|_| parsed.name.eq_ignore_ascii_case("help")) {
                let outcome = DispatchOutcome::Handled {
                    usage: "help".to_string(),
                    reply: Some(help.get_help(manager, &parsed.args)),
                };
                return Ok((outcome, None));
            }
            tracing::debug!("No command matches '{}'", parsed.name);
            return Ok((DispatchOutcome::NotFound(parsed.name), None));
        };

        let (command, args) = descend(top, &parsed.args, message);
        let usage = command.usage();
        tracing::debug!("Message {} matched '{}' from plugin '{}'", message.id, usage, plugin_id);

        let channel = message.channel.kind;
        if (channel.is_private() && command.guild_only()) || (channel == ChannelKind::Guild && command.dm_only()) {
            return Ok((DispatchOutcome::WrongChannel { usage, channel }, Some(command)));
        }

        let reply = match channel {
            ChannelKind::Guild => {
                let Some(guild) = &message.guild else {
                    tracing::warn!("Guild message {} carries no guild", message.id);
                    return Ok((DispatchOutcome::Ignored, None));
                };
                if let Some(member) = &message.member {
                    if !command.check_authorization(member) {
                        tracing::info!("{} is not allowed to run '{}'", member.user, usage);
                        return Ok((DispatchOutcome::Unauthorized(usage), Some(command)));
                    }
                }
                command.on_guild_message(&GuildContext {
                    message,
                    author: &message.author,
                    channel: &message.channel,
                    guild,
                    client: command.client(),
                    args,
                })?
            }
            ChannelKind::Direct | ChannelKind::Group => command.on_direct_message(&DirectContext {
                message,
                author: &message.author,
                channel: &message.channel,
                client: command.client(),
                args,
            })?,
        };

        Ok((DispatchOutcome::Handled { usage, reply }, Some(command)))
    }
}

/// Follow argument tokens down the sub command tree as far as they match
fn descend<'a>(top: Command, args: &'a [String], message: &Message) -> (Command, &'a [String]) {
    let mut command = top;
    let mut rest = args;
    while let Some((token, tail)) = rest.split_first() {
        match command.resolve_sub_command(token, message) {
            Some(sub) => {
                command = sub;
                rest = tail;
            }
            None => break,
        }
    }
    (command, rest)
}
