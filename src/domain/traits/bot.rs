use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - the connected chat-platform client.
///
/// Commands and plugins only hold on to it and hand it to handlers; the
/// connection itself is owned by the implementation.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Start the bot and begin listening for messages
    async fn start(&self) -> Result<(), BotError>;

    /// Send a message to a channel
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
