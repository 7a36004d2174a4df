//! Auth fetchers: login and token verification

use tracing::info;

use crate::api::error::ApiError;
use crate::api::transport::ApiClient;
use crate::api::types::{HealthStatus, LoginData, LoginRequest, VerifiedSession};

/// Exchange broker credentials for a session token.
///
/// The caller stores the returned token in the session store; this fetcher
/// does not mutate session state itself.
pub async fn login(
    client: &ApiClient,
    client_id: &str,
    password: &str,
    totp: &str,
) -> Result<LoginData, ApiError> {
    let body = LoginRequest {
        client_id: client_id.to_string(),
        password: password.to_string(),
        totp: totp.to_string(),
    };
    let data: LoginData = client.post("/auth/login", &body).await?;
    info!(client_id, "Login accepted");
    Ok(data)
}

/// Check the current token against the backend
pub async fn verify(client: &ApiClient) -> Result<VerifiedSession, ApiError> {
    client.get("/auth/verify").await
}

/// Backend liveness probe
pub async fn health(client: &ApiClient) -> Result<HealthStatus, ApiError> {
    client.get("/health").await
}
