//! Runtime configuration for the dashboard client

use std::time::Duration;

/// Default API base address when `FINDASH_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default realtime chat endpoint when `FINDASH_WS_URL` is unset
pub const DEFAULT_WS_URL: &str = "ws://localhost:5000/ws/chat";

/// Fixed per-request timeout ceiling
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default refresh interval for polled views
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Connection settings shared by the transport client and the chat channel
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for the HTTP API (no trailing slash)
    pub base_url: String,
    /// URL for the realtime chat channel
    pub ws_url: String,
    /// Per-request timeout ceiling
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Build configuration from the environment, falling back to the local defaults
    pub fn from_env() -> Self {
        let base_url = std::env::var("FINDASH_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let ws_url = std::env::var("FINDASH_WS_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_WS_URL.to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ws_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the base URL (used by tests against a local mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
