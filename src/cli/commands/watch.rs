//! Live dashboard: one synchronizer keeping portfolio + market + news fresh

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::Arc;
use std::time::Duration;

use crate::api::types::{MarketSnapshot, NewsItem, Portfolio};
use crate::api::{stocks, ApiClient, ApiError};
use crate::config::ApiConfig;
use crate::data_paths::DataPaths;
use crate::display;
use crate::session::SessionStore;
use crate::sync::{self, FetchCycle, ViewState};

#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds
    #[arg(long, default_value = "60")]
    pub interval: u64,
}

/// Everything the dashboard page renders
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub portfolio: Portfolio,
    pub market: MarketSnapshot,
    pub news: Vec<NewsItem>,
}

/// One dashboard cycle: all three resources fan out together and the cycle
/// fails as a unit if any of them fails
pub struct DashboardCycle {
    client: Arc<ApiClient>,
}

#[async_trait]
impl FetchCycle for DashboardCycle {
    type Output = DashboardData;

    async fn fetch(&self) -> Result<DashboardData, ApiError> {
        let (portfolio, market, news) = tokio::try_join!(
            stocks::portfolio(&self.client),
            stocks::market(&self.client),
            stocks::news(&self.client),
        )?;
        Ok(DashboardData {
            portfolio,
            market,
            news,
        })
    }
}

pub struct WatchCommand {
    args: WatchArgs,
}

impl WatchCommand {
    pub fn new(args: WatchArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, config: &ApiConfig, data_paths: DataPaths) -> Result<()> {
        let session = Arc::new(SessionStore::open(&data_paths));
        if !session.is_authenticated() {
            println!(
                "{} Not logged in - run 'findash login' first.",
                "!".yellow()
            );
            return Ok(());
        }

        let client = Arc::new(ApiClient::new(config, session.clone())?);
        let mut logout_rx = session.watch_logout();

        let interval = Duration::from_secs(self.args.interval);
        let (state, handle) = sync::spawn("dashboard", interval, DashboardCycle { client });

        // Full spinner only while there is no cached value to show
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Loading dashboard...");
        while state.read().await.is_first_load() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        spinner.finish_and_clear();

        render(&*state.read().await, self.args.interval);

        // Redraw slightly after each expected cycle so the screen shows the
        // freshest outcome
        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + interval + Duration::from_millis(500),
            interval,
        );

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    break;
                }
                changed = logout_rx.changed() => {
                    if changed.is_ok() {
                        println!();
                        println!(
                            "{} Session expired - run 'findash login' to sign in again.",
                            "!".red()
                        );
                    }
                    break;
                }
                _ = ticker.tick() => {
                    render(&*state.read().await, self.args.interval);
                }
            }
        }

        handle.shutdown().await;
        Ok(())
    }
}

fn render(view: &ViewState<DashboardData>, interval_secs: u64) {
    // Clear screen and move the cursor home
    print!("\x1B[2J\x1B[1;1H");

    println!("{}", "═".repeat(70).bright_blue());
    println!(
        "{}  {}",
        "FINDASH DASHBOARD".bright_white().bold(),
        format!("(refreshes every {}s, Ctrl-C to quit)", interval_secs).bright_black()
    );
    println!("{}", "═".repeat(70).bright_blue());
    println!();

    match &view.value {
        Some(data) => {
            display::print_portfolio(&data.portfolio);
            println!();
            display::print_market(&data.market);
            println!();
            display::print_news(&data.news);
        }
        None => {
            println!("No data yet.");
        }
    }

    // Non-blocking indicator: stale data stays on screen under the warning
    if let Some(error) = &view.error {
        println!();
        println!(
            "{} {} {}",
            "⚠".yellow(),
            error.yellow(),
            "- showing last good data".bright_black()
        );
    }
}
