use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use std::sync::Arc;

use crate::api::{self, ApiClient};
use crate::config::ApiConfig;
use crate::data_paths::DataPaths;
use crate::session::SessionStore;

#[derive(Args)]
pub struct LoginArgs {
    /// Broker client ID
    pub client_id: String,

    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// TOTP code (prompted when omitted)
    #[arg(long)]
    pub totp: Option<String>,
}

pub struct LoginCommand {
    args: LoginArgs,
}

impl LoginCommand {
    pub fn new(args: LoginArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, config: &ApiConfig, data_paths: DataPaths) -> Result<()> {
        let session = Arc::new(SessionStore::open(&data_paths));
        let client = ApiClient::new(config, session.clone())?;

        let password = match &self.args.password {
            Some(password) => password.clone(),
            None => rpassword::prompt_password("Password: ")?,
        };
        let totp = match &self.args.totp {
            Some(totp) => totp.clone(),
            None => rpassword::prompt_password("TOTP code: ")?,
        };

        let data = api::auth::login(&client, &self.args.client_id, &password, &totp).await?;
        session.login(data.token);

        match data.profile.and_then(|p| p.name) {
            Some(name) => println!("{} Welcome back, {}.", "✓".green(), name.bright_white()),
            None => println!("{} Login successful.", "✓".green()),
        }
        Ok(())
    }
}
