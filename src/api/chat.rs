//! HTTP chat fetcher (`POST /chat`)
//!
//! The interactive assistant normally talks over the realtime channel; this
//! request/response endpoint backs one-shot questions.

use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::transport::ApiClient;

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatData {
    response: String,
}

/// Ask the assistant one question over plain HTTP
pub async fn send_chat(client: &ApiClient, message: &str) -> Result<String, ApiError> {
    let data: ChatData = client.post("/chat", &ChatBody { message }).await?;
    Ok(data.response)
}
