//! Transport client: one configured HTTP client shared by every fetcher
//!
//! Each request picks up the current bearer token from the session store.
//! Responses are unwrapped from the uniform `{data, message?, status}`
//! envelope. A 401 clears the session and fires the logout signal before the
//! error reaches the caller, so views never handle re-auth themselves.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::api::types::Envelope;
use crate::config::ApiConfig;
use crate::session::SessionStore;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            session,
        })
    }

    /// The session store this client reads tokens from
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, path).json(body))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Global recovery: clear the session and signal the login
            // boundary, regardless of which view issued the request. Runs
            // once per offending response; concurrent 401s each fire it.
            self.session.expire();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Request failed: {}", message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        debug!(status = envelope.status, "Response envelope unwrapped");
        Ok(envelope.data)
    }
}
