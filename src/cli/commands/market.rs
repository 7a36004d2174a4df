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
pub struct MarketArgs {
    /// Skip the news section
    #[arg(long)]
    pub no_news: bool,
}

pub struct MarketCommand {
    args: MarketArgs,
}

impl MarketCommand {
    pub fn new(args: MarketArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, config: &ApiConfig, data_paths: DataPaths) -> Result<()> {
        let session = Arc::new(SessionStore::open(&data_paths));
        let client = ApiClient::new(config, session)?;

        if self.args.no_news {
            let snapshot = stocks::market(&client).await.map_err(auth_hint)?;
            display::print_market(&snapshot);
            return Ok(());
        }

        let (snapshot, news) =
            tokio::try_join!(stocks::market(&client), stocks::news(&client)).map_err(auth_hint)?;

        display::print_market(&snapshot);
        println!();
        display::print_news(&news);
        Ok(())
    }
}
