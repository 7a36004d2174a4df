//! CLI module for findash
//!
//! Argument parsing via clap, with one Args/Command pair per subcommand.
//! Each subcommand is a "page": it opens the session store, builds the
//! transport client, and mounts whatever synchronizers it needs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::config::ApiConfig;
use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::logging::{init_logging, LogMode, LoggingConfig};

use commands::chat::{ChatArgs, ChatCommand};
use commands::login::{LoginArgs, LoginCommand};
use commands::logout::{LogoutArgs, LogoutCommand};
use commands::market::{MarketArgs, MarketCommand};
use commands::portfolio::{PortfolioArgs, PortfolioCommand};
use commands::status::{StatusArgs, StatusCommand};
use commands::watch::{WatchArgs, WatchCommand};

#[derive(Parser)]
#[command(name = "findash")]
#[command(version)]
#[command(about = "Terminal client for the FinanceAI portfolio dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with broker credentials and store the session token
    Login(LoginArgs),

    /// Clear the stored session
    Logout(LogoutArgs),

    /// Show session and backend status
    Status(StatusArgs),

    /// Show holdings and open positions
    Portfolio(PortfolioArgs),

    /// Show market overview and news
    Market(MarketArgs),

    /// Live dashboard refreshed on a fixed interval
    Watch(WatchArgs),

    /// Talk to the AI financial advisor
    Chat(ChatArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);
        data_paths.ensure_directories()?;

        // Commands that own the terminal log to file only
        let mode = match &self.command {
            Commands::Watch(_) | Commands::Chat(_) => LogMode::FileOnly,
            _ => LogMode::ConsoleAndFile,
        };
        init_logging(LoggingConfig::new(mode, data_paths.clone()))?;

        let config = ApiConfig::from_env();

        match self.command {
            Commands::Login(args) => LoginCommand::new(args).execute(&config, data_paths).await,
            Commands::Logout(args) => LogoutCommand::new(args).execute(&config, data_paths).await,
            Commands::Status(args) => StatusCommand::new(args).execute(&config, data_paths).await,
            Commands::Portfolio(args) => {
                PortfolioCommand::new(args).execute(&config, data_paths).await
            }
            Commands::Market(args) => MarketCommand::new(args).execute(&config, data_paths).await,
            Commands::Watch(args) => WatchCommand::new(args).execute(&config, data_paths).await,
            Commands::Chat(args) => ChatCommand::new(args).execute(&config, data_paths).await,
        }
    }
}
