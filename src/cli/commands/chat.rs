//! Interactive AI advisor over the realtime channel

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::{stocks, ApiClient};
use crate::chat::{self, ChatMessage, ChatRole, ChatSession};
use crate::config::ApiConfig;
use crate::data_paths::DataPaths;
use crate::session::SessionStore;
use crate::ws::client::ChatConfig;

#[derive(Args)]
pub struct ChatArgs {
    /// One-shot question (interactive when omitted)
    pub message: Option<String>,

    /// Do not send portfolio context with the question
    #[arg(long)]
    pub no_context: bool,

    /// Start with a fresh conversation
    #[arg(long)]
    pub no_history: bool,
}

pub struct ChatCommand {
    args: ChatArgs,
}

impl ChatCommand {
    pub fn new(args: ChatArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, config: &ApiConfig, data_paths: DataPaths) -> Result<()> {
        let session = Arc::new(SessionStore::open(&data_paths));
        let client = ApiClient::new(config, session.clone())?;

        // Portfolio context enriches the advisor's answers; the chat itself
        // works without it
        let context = if self.args.no_context || !session.is_authenticated() {
            None
        } else {
            match stocks::portfolio(&client).await {
                Ok(portfolio) => serde_json::to_value(portfolio).ok(),
                Err(e) => {
                    tracing::warn!("Continuing without portfolio context: {}", e);
                    None
                }
            }
        };

        let mut chat_session = ChatSession::open(ChatConfig::new(config.ws_url.clone())).await?;
        if !self.args.no_history {
            chat_session.restore(chat::load_history(&data_paths));
        }

        if let Some(message) = &self.args.message {
            ask_and_print(&mut chat_session, message.clone(), context).await;
            chat::save_history(&data_paths, chat_session.messages())?;
            return Ok(());
        }

        println!(
            "{}",
            "Ask me anything about investments and financial planning!".bright_black()
        );
        println!("{}", "(Ctrl-C or /quit to leave)".bright_black());
        for message in chat_session.messages() {
            print_message(message);
        }

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            print!("{} ", "you>".bright_cyan());
            std::io::stdout().flush()?;

            let line = tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                line = lines.next_line() => line?,
            };

            let Some(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "/quit" {
                break;
            }

            ask_and_print(&mut chat_session, line.to_string(), context.clone()).await;
            chat::save_history(&data_paths, chat_session.messages())?;
        }

        chat::save_history(&data_paths, chat_session.messages())?;
        Ok(())
    }
}

async fn ask_and_print(
    session: &mut ChatSession,
    message: String,
    context: Option<serde_json::Value>,
) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Thinking...");

    let reply = session.ask(message, context).await.clone();

    spinner.finish_and_clear();
    print_message(&reply);
}

fn print_message(message: &ChatMessage) {
    match message.role {
        ChatRole::User => println!("{} {}", "you>".bright_cyan(), message.content),
        ChatRole::Assistant => println!("{} {}", "advisor>".green(), message.content),
    }
}
