use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use std::sync::Arc;

use crate::api::{self, ApiClient, ApiError};
use crate::config::ApiConfig;
use crate::data_paths::DataPaths;
use crate::session::SessionStore;

#[derive(Args)]
pub struct StatusArgs {}

pub struct StatusCommand {
    #[allow(dead_code)]
    args: StatusArgs,
}

impl StatusCommand {
    pub fn new(args: StatusArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, config: &ApiConfig, data_paths: DataPaths) -> Result<()> {
        let session = Arc::new(SessionStore::open(&data_paths));
        let client = ApiClient::new(config, session.clone())?;

        println!("API endpoint: {}", config.base_url.bright_cyan());

        match api::auth::health(&client).await {
            Ok(health) => println!("Backend:      {} ({})", "reachable".green(), health.status),
            Err(e) => println!("Backend:      {} ({})", "unreachable".red(), e),
        }

        if !session.is_authenticated() {
            println!("Session:      {}", "not logged in".yellow());
            return Ok(());
        }

        match api::auth::verify(&client).await {
            Ok(verified) => {
                println!(
                    "Session:      {} as {}",
                    "valid".green(),
                    verified.client_id.bright_white()
                );
            }
            Err(ApiError::Unauthorized) => {
                // The transport already cleared the stored token
                println!(
                    "Session:      {} - run 'findash login' to sign in again",
                    "expired".red()
                );
            }
            Err(e) => println!("Session:      {} ({})", "unknown".yellow(), e),
        }
        Ok(())
    }
}
