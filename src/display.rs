//! Terminal rendering for portfolio and market data

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::api::types::{Holding, MarketSnapshot, NewsImpact, NewsItem, Portfolio, Position};

/// Format a signed value with a leading `+` for gains
fn signed(value: Decimal) -> String {
    if value >= Decimal::ZERO {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn print_signed_colored(label: &str, value: Decimal, suffix: &str) {
    let formatted = format!("{}{}", signed(value), suffix);
    if value >= Decimal::ZERO {
        println!("{:<20} {}", label, formatted.green());
    } else {
        println!("{:<20} {}", label, formatted.red());
    }
}

pub fn print_portfolio(portfolio: &Portfolio) {
    println!("{}", "PORTFOLIO".bright_yellow().bold());
    println!("{}", "─".repeat(50).bright_black());
    println!(
        "{:<20} {}",
        "Total Value",
        format!("{:.2}", portfolio.total_value).bright_white().bold()
    );
    print_signed_colored("Daily Change", portfolio.metrics.daily_change, "%");
    println!(
        "{:<20} {:.2}",
        "Invested", portfolio.metrics.total_investments
    );
    print_signed_colored("Total P&L", portfolio.metrics.total_pl, "");
    print_signed_colored("Daily P&L", portfolio.metrics.daily_pl, "");
    println!();

    print_holdings(&portfolio.holdings);
    if !portfolio.positions.is_empty() {
        println!();
        print_positions(&portfolio.positions);
    }
}

pub fn print_holdings(holdings: &[Holding]) {
    println!("{}", "HOLDINGS".bright_yellow().bold());
    if holdings.is_empty() {
        println!("No holdings found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Symbol", "Qty", "Avg Price", "LTP", "Invested", "P&L"]);

    for holding in holdings {
        table.add_row(vec![
            holding.tradingsymbol.clone(),
            format!("{}", holding.quantity),
            format!("{:.2}", holding.averageprice),
            format!("{:.2}", holding.ltp),
            format!("{:.2}", holding.invested()),
            signed(holding.pnl),
        ]);
    }
    println!("{table}");
}

pub fn print_positions(positions: &[Position]) {
    println!("{}", "POSITIONS".bright_yellow().bold());
    if positions.is_empty() {
        println!("No open positions.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Symbol", "Net Qty", "LTP", "Day P&L"]);

    for position in positions {
        table.add_row(vec![
            position.tradingsymbol.clone(),
            format!("{}", position.netqty),
            position
                .ltp
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "-".to_string()),
            signed(position.day_pl),
        ]);
    }
    println!("{table}");
}

pub fn print_market(snapshot: &MarketSnapshot) {
    println!("{}", "MARKET OVERVIEW".bright_yellow().bold());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Index", "Value", "Change"]);
    for index in &snapshot.indices {
        table.add_row(vec![
            index.name.clone(),
            format!("{:.2}", index.value),
            format!("{}%", signed(index.change_percent)),
        ]);
    }
    println!("{table}");

    if !snapshot.sectors.is_empty() {
        println!();
        println!("{}", "SECTOR PERFORMANCE".bright_yellow().bold());
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Sector", "Change"]);
        for sector in &snapshot.sectors {
            table.add_row(vec![
                sector.sector.clone(),
                format!("{}%", signed(sector.change_percent)),
            ]);
        }
        println!("{table}");
    }
}

pub fn print_news(items: &[NewsItem]) {
    println!("{}", "MARKET NEWS".bright_yellow().bold());
    if items.is_empty() {
        println!("No news right now.");
        return;
    }

    for item in items {
        let impact = match item.impact {
            NewsImpact::Positive => format!("{}", "▲".green()),
            NewsImpact::Negative => format!("{}", "▼".red()),
            NewsImpact::Neutral => format!("{}", "•".bright_black()),
        };
        println!("{} {}", impact, item.title.bright_white());
        println!(
            "  {} · {}",
            item.source.bright_black(),
            item.time.bright_black()
        );
    }
}
