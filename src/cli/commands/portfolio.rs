use anyhow::Result;
use clap::Args;
use std::sync::Arc;

use super::auth_hint;
use crate::api::{stocks, ApiClient};
use crate::config::ApiConfig;
use crate::data_paths::DataPaths;
use crate::display;
use crate::session::SessionStore;

#[derive(Args)]
pub struct PortfolioArgs {
    /// Show only holdings
    #[arg(long)]
    pub holdings_only: bool,
}

pub struct PortfolioCommand {
    args: PortfolioArgs,
}

impl PortfolioCommand {
    pub fn new(args: PortfolioArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, config: &ApiConfig, data_paths: DataPaths) -> Result<()> {
        let session = Arc::new(SessionStore::open(&data_paths));
        let client = ApiClient::new(config, session)?;

        if self.args.holdings_only {
            let holdings = stocks::holdings(&client).await.map_err(auth_hint)?;
            display::print_holdings(&holdings);
            return Ok(());
        }

        // The portfolio page needs both resources; fetch them together
        let (holdings, positions) =
            tokio::try_join!(stocks::holdings(&client), stocks::positions(&client))
                .map_err(auth_hint)?;

        display::print_holdings(&holdings);
        println!();
        display::print_positions(&positions);
        Ok(())
    }
}
