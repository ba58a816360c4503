//! Domain traits - Abstractions implemented outside the core

pub mod bot;
pub mod handler;

pub use bot::{Bot, BotInfo};
pub use handler::{handler_fn, rules_allow, CommandHandler, DirectContext, FnHandler, GuildContext, HandlerResult};
