//! Wire types for the realtime chat channel

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),
    #[error("Reply carried neither response nor error")]
    EmptyReply,
}

/// Outbound event: the user's question plus optional portfolio context
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    #[serde(rename = "userPortfolio", skip_serializing_if = "Option::is_none")]
    pub user_portfolio: Option<serde_json::Value>,
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            user_portfolio: None,
            message: message.into(),
        }
    }

    pub fn with_portfolio(mut self, portfolio: serde_json::Value) -> Self {
        self.user_portfolio = Some(portfolio);
        self
    }
}

/// Inbound wire shape: exactly one of `response` or `error`
#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Events published to the page
#[derive(Debug, Clone)]
pub enum ChatEvent {
    Response(String),
    Error(String),
}

/// Parse one inbound frame. An `error` field wins over `response` so a
/// malformed double-reply still surfaces the failure.
pub fn parse_event(text: &str) -> Result<ChatEvent, EventError> {
    let reply: ChatReply =
        serde_json::from_str(text).map_err(|e| EventError::InvalidFormat(e.to_string()))?;

    if let Some(error) = reply.error {
        return Ok(ChatEvent::Error(error));
    }
    reply
        .response
        .map(ChatEvent::Response)
        .ok_or(EventError::EmptyReply)
}
