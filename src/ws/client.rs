//! WebSocket client for the chat assistant with auto-reconnection

use backoff::{backoff::Backoff, ExponentialBackoff};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_WS_URL;
use crate::ws::events::{parse_event, ChatEvent, ChatRequest};

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Channel send error")]
    ChannelSend,
}

/// Commands that can be sent to the channel task
#[derive(Debug)]
enum ChannelCommand {
    Send(ChatRequest),
    Disconnect,
}

/// Chat channel configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Chat feed URL
    pub url: String,
    /// Bounded wait for an assistant reply
    pub response_timeout: Duration,
    /// Maximum reconnection attempts (0 = infinite)
    pub max_reconnection_attempts: u32,
    /// Initial reconnection delay in milliseconds
    pub initial_reconnection_delay: u64,
    /// Maximum reconnection delay in milliseconds
    pub max_reconnection_delay: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WS_URL.to_string(),
            response_timeout: Duration::from_secs(30),
            max_reconnection_attempts: 0, // Infinite retries
            initial_reconnection_delay: 1000,
            max_reconnection_delay: 30000,
        }
    }
}

impl ChatConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Handle to the persistent chat connection. One is opened per page
/// activation; dropping it ends the connection task.
pub struct ChatChannel {
    command_tx: mpsc::UnboundedSender<ChannelCommand>,
    event_rx: broadcast::Receiver<ChatEvent>,
}

impl ChatChannel {
    /// Open the channel and spawn its connection task
    pub async fn connect(config: ChatConfig) -> Result<Self, ChannelError> {
        // A malformed endpoint fails here, before the reconnect loop starts
        url::Url::parse(&config.url)?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = broadcast::channel(64);

        tokio::spawn(async move {
            Self::connection_task(config, command_rx, event_tx).await;
        });

        Ok(Self {
            command_tx,
            event_rx,
        })
    }

    /// Fire-and-forget send; the reply arrives on the event receiver
    pub fn send(&self, request: ChatRequest) -> Result<(), ChannelError> {
        self.command_tx
            .send(ChannelCommand::Send(request))
            .map_err(|_| ChannelError::ChannelSend)
    }

    /// Get a receiver for incoming events. Call once per activation; drop
    /// the receiver on deactivation to deregister the listener.
    pub fn events(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_rx.resubscribe()
    }

    /// Disconnect
    pub fn disconnect(&self) -> Result<(), ChannelError> {
        self.command_tx
            .send(ChannelCommand::Disconnect)
            .map_err(|_| ChannelError::ChannelSend)
    }

    /// Main connection task with auto-reconnection
    async fn connection_task(
        config: ChatConfig,
        mut command_rx: mpsc::UnboundedReceiver<ChannelCommand>,
        event_tx: broadcast::Sender<ChatEvent>,
    ) {
        let mut reconnection_attempts = 0;

        loop {
            match Self::connect_and_run(&config.url, &mut command_rx, &event_tx).await {
                Ok(()) => {
                    info!("Chat connection closed normally");
                    break;
                }
                Err(e) => {
                    error!("Chat connection error: {}", e);

                    if config.max_reconnection_attempts > 0
                        && reconnection_attempts >= config.max_reconnection_attempts
                    {
                        error!("Maximum reconnection attempts reached");
                        break;
                    }

                    reconnection_attempts += 1;

                    let mut backoff = ExponentialBackoff {
                        initial_interval: Duration::from_millis(config.initial_reconnection_delay),
                        max_interval: Duration::from_millis(config.max_reconnection_delay),
                        max_elapsed_time: None,
                        ..Default::default()
                    };

                    if let Some(delay) = backoff.next_backoff() {
                        warn!(
                            "Reconnecting in {:?} (attempt {})",
                            delay, reconnection_attempts
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    /// Connect and run one WebSocket session
    async fn connect_and_run(
        url: &str,
        command_rx: &mut mpsc::UnboundedReceiver<ChannelCommand>,
        event_tx: &broadcast::Sender<ChatEvent>,
    ) -> Result<(), ChannelError> {
        info!("Connecting to chat channel: {}", url);

        let (ws_stream, response) = connect_async(url).await?;
        let (mut write, mut read) = ws_stream.split();

        info!("Chat channel connected. Status: {:?}", response.status());

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            debug!("Raw chat frame received: {}", text);
                            match parse_event(&text) {
                                Ok(event) => {
                                    if let Err(e) = event_tx.send(event) {
                                        warn!("No listener for chat event: {}", e);
                                    }
                                }
                                Err(e) => {
                                    error!("Failed to parse chat frame: {} - Raw: {}", e, text);
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            info!("Chat channel closed by server");
                            break;
                        }
                        Some(Err(e)) => {
                            error!("Chat channel error: {}", e);
                            return Err(ChannelError::Connection(e));
                        }
                        None => {
                            warn!("Chat stream ended");
                            return Err(ChannelError::Connection(
                                tokio_tungstenite::tungstenite::Error::ConnectionClosed
                            ));
                        }
                        _ => {
                            // Ignore other frame types
                        }
                    }
                }

                cmd = command_rx.recv() => {
                    match cmd {
                        Some(ChannelCommand::Send(request)) => {
                            let msg = serde_json::to_string(&request)?;
                            debug!("Sending chat message: {}", msg);
                            write.send(Message::Text(msg.into())).await?;
                        }
                        Some(ChannelCommand::Disconnect) => {
                            info!("Disconnect requested");
                            write.send(Message::Close(None)).await?;
                            break;
                        }
                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
