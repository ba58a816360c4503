//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use crate::application::errors::BotError;
use crate::application::messaging::{DispatchOutcome, MessageDispatcher};
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Bot, BotInfo};
use crate::plugins::PluginManager;

/// Console bot adapter for local development. Every line typed is treated
/// as a direct message from the local user.
pub struct ConsoleAdapter {
    info: BotInfo,
    sender: Option<mpsc::Sender<String>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "cordwain".to_string(),
                username: "console".to_string(),
            },
            sender: None,
        }
    }

    /// Forward outgoing messages to a channel instead of stdout
    pub fn with_sender(mut self, sender: mpsc::Sender<String>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Read stdin until EOF or `/quit`, dispatching each line
    pub async fn run(&self, manager: &PluginManager, dispatcher: &MessageDispatcher) -> Result<(), BotError> {
        let user = User::new("console-user").with_username("you");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "/quit" {
                break;
            }

            let message = Message::direct(user.clone(), line).with_platform("console");
            match dispatcher.handle(manager, &message).await {
                Ok(DispatchOutcome::NotFound(name)) => println!("[BOT] Unknown command: {}", name),
                Ok(DispatchOutcome::WrongChannel { usage, .. }) => {
                    println!("[BOT] {} cannot be used here", usage)
                }
                Ok(outcome) => tracing::debug!("Outcome: {:?}", outcome),
                Err(e) => tracing::error!("Command failed: {}", e),
            }
        }

        Ok(())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _channel_id: &str, text: &str) -> Result<String, BotError> {
        match &self.sender {
            Some(sender) => sender
                .send(text.to_string())
                .await
                .map_err(|e| BotError::Network(e.to_string()))?,
            None => println!("[BOT] {}", text),
        }
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Shareable console client
pub fn console_client() -> Arc<ConsoleAdapter> {
    Arc::new(ConsoleAdapter::new())
}
