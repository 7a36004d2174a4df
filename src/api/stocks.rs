//! Data fetchers for the `/stocks` resources
//!
//! Each fetcher is a pure wrapper: fixed path, fixed method, envelope
//! unwrapped by the transport. No retry, no caching; retry policy belongs to
//! the synchronizer that drives them.

use crate::api::error::ApiError;
use crate::api::transport::ApiClient;
use crate::api::types::{
    Candle, Holding, MarketSnapshot, NewsItem, Portfolio, Position, Profile, Quote,
};

/// Query range for historical candles
#[derive(Debug, Clone)]
pub struct HistoricalRange {
    pub from_date: String,
    pub to_date: String,
    pub interval: String,
}

pub async fn portfolio(client: &ApiClient) -> Result<Portfolio, ApiError> {
    client.get("/stocks/portfolio").await
}

pub async fn holdings(client: &ApiClient) -> Result<Vec<Holding>, ApiError> {
    client.get("/stocks/holdings").await
}

pub async fn positions(client: &ApiClient) -> Result<Vec<Position>, ApiError> {
    client.get("/stocks/positions").await
}

pub async fn market(client: &ApiClient) -> Result<MarketSnapshot, ApiError> {
    client.get("/stocks/market").await
}

pub async fn news(client: &ApiClient) -> Result<Vec<NewsItem>, ApiError> {
    client.get("/stocks/news").await
}

pub async fn profile(client: &ApiClient) -> Result<Profile, ApiError> {
    client.get("/stocks/profile").await
}

pub async fn live_price(client: &ApiClient, symbol_token: &str) -> Result<Quote, ApiError> {
    client.get(&format!("/stocks/price/{}", symbol_token)).await
}

pub async fn historical(
    client: &ApiClient,
    symbol_token: &str,
    range: &HistoricalRange,
) -> Result<Vec<Candle>, ApiError> {
    let path = format!(
        "/stocks/historical/{}?from_date={}&to_date={}&interval={}",
        symbol_token, range.from_date, range.to_date, range.interval
    );
    client.get(&path).await
}
