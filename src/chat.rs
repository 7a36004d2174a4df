//! Chat conversation state for the assistant view
//!
//! The conversation is append-only: every question appends a user entry and
//! exactly one assistant entry, whether the assistant answered, the channel
//! reported an error, or the bounded wait ran out. History is persisted by
//! the surrounding shell to a file under the data directory.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::warn;

use crate::data_paths::DataPaths;
use crate::ws::client::{ChannelError, ChatChannel, ChatConfig};
use crate::ws::events::{ChatEvent, ChatRequest};

/// File name of the persisted conversation inside the chat directory
const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// One activation of the assistant view: a persistent channel plus the
/// ordered conversation
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    channel: ChatChannel,
    events: broadcast::Receiver<ChatEvent>,
    response_timeout: Duration,
}

impl ChatSession {
    /// Open the realtime channel and register the single event listener for
    /// this activation
    pub async fn open(config: ChatConfig) -> Result<Self, ChannelError> {
        let response_timeout = config.response_timeout;
        let channel = ChatChannel::connect(config).await?;
        let events = channel.events();
        Ok(Self {
            messages: Vec::new(),
            channel,
            events,
            response_timeout,
        })
    }

    /// Seed the conversation with history restored by the shell
    pub fn restore(&mut self, history: Vec<ChatMessage>) {
        self.messages = history;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a question and wait (bounded) for the reply. Always appends the
    /// user entry and one assistant entry, in that order.
    pub async fn ask(
        &mut self,
        message: impl Into<String>,
        portfolio: Option<serde_json::Value>,
    ) -> &ChatMessage {
        let message = message.into();
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: message.clone(),
        });

        let mut request = ChatRequest::new(message);
        if let Some(portfolio) = portfolio {
            request = request.with_portfolio(portfolio);
        }

        let content = match self.channel.send(request) {
            Ok(()) => self.await_reply().await,
            Err(e) => {
                warn!("Failed to send chat message: {}", e);
                format!("Sorry, I encountered an error: {}. Please try again.", e)
            }
        };

        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content,
        });
        self.messages.last().expect("just pushed")
    }

    async fn await_reply(&mut self) -> String {
        let wait = tokio::time::timeout(self.response_timeout, async {
            loop {
                match self.events.recv().await {
                    Ok(ChatEvent::Response(response)) => break response,
                    Ok(ChatEvent::Error(error)) => {
                        // Channel errors stay conversational; they never
                        // abort the channel
                        warn!("Assistant returned an error payload: {}", error);
                        break format!(
                            "Sorry, I encountered an error: {}. Please try again.",
                            error
                        );
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Chat listener lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break "Sorry, the connection to the assistant was lost. Please try again."
                            .to_string();
                    }
                }
            }
        })
        .await;

        match wait {
            Ok(content) => content,
            Err(_) => {
                warn!(
                    "No assistant reply within {:?}",
                    self.response_timeout
                );
                format!(
                    "Sorry, the assistant did not respond within {} seconds. Please try again.",
                    self.response_timeout.as_secs()
                )
            }
        }
    }
}

/// Load the persisted conversation, if any
pub fn load_history(data_paths: &DataPaths) -> Vec<ChatMessage> {
    let path = data_paths.chat().join(HISTORY_FILE);
    match std::fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed chat history {}: {}", path.display(), e);
            Vec::new()
        }),
        Err(_) => Vec::new(),
    }
}

/// Persist the conversation for the next run
pub fn save_history(data_paths: &DataPaths, messages: &[ChatMessage]) -> anyhow::Result<()> {
    let path = data_paths.chat().join(HISTORY_FILE);
    let json = serde_json::to_string_pretty(messages)?;
    std::fs::write(&path, json)?;
    Ok(())
}
