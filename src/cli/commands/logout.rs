use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use crate::config::ApiConfig;
use crate::data_paths::DataPaths;
use crate::session::SessionStore;

#[derive(Args)]
pub struct LogoutArgs {}

pub struct LogoutCommand {
    #[allow(dead_code)]
    args: LogoutArgs,
}

impl LogoutCommand {
    pub fn new(args: LogoutArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, _config: &ApiConfig, data_paths: DataPaths) -> Result<()> {
        let session = SessionStore::open(&data_paths);
        if !session.is_authenticated() {
            println!("No active session.");
            return Ok(());
        }
        session.logout();
        println!("{} Session cleared.", "✓".green());
        Ok(())
    }
}
