//! Realtime channel for the chat assistant
//!
//! A persistent duplex WebSocket connection, independent of the polled
//! request/response resources.

pub mod client;
pub mod events;

pub use client::{ChatChannel, ChatConfig, ChannelError};
pub use events::{ChatEvent, ChatRequest};
