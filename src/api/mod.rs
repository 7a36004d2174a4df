//! HTTP API layer: transport client, error taxonomy, and per-resource fetchers

pub mod auth;
pub mod chat;
pub mod error;
pub mod stocks;
pub mod transport;
pub mod types;

pub use error::ApiError;
pub use transport::ApiClient;
