//! Wire types: the uniform response envelope and the typed resource models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The uniform `{data, message?, status}` wrapper every successful API
/// response uses. `data` is present whenever the HTTP status is 2xx.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: i64,
}

/// One holding in the user's portfolio
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Holding {
    pub tradingsymbol: String,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub symboltoken: Option<String>,
    pub quantity: Decimal,
    pub averageprice: Decimal,
    /// Last traded price
    pub ltp: Decimal,
    pub pnl: Decimal,
}

impl Holding {
    pub fn invested(&self) -> Decimal {
        self.averageprice * self.quantity
    }

    pub fn current_value(&self) -> Decimal {
        self.ltp * self.quantity
    }
}

/// One open intraday/derivative position
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub tradingsymbol: String,
    #[serde(default)]
    pub exchange: Option<String>,
    pub netqty: Decimal,
    #[serde(rename = "dayPl")]
    pub day_pl: Decimal,
    #[serde(default)]
    pub ltp: Option<Decimal>,
}

/// Aggregate metrics computed by the backend for the dashboard header
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PortfolioMetrics {
    pub daily_change: Decimal,
    pub total_investments: Decimal,
    pub total_pl: Decimal,
    pub daily_pl: Decimal,
}

/// One OHLCV candle: `[time, open, high, low, close, volume]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Candle(
    pub String,
    pub Decimal,
    pub Decimal,
    pub Decimal,
    pub Decimal,
    pub Decimal,
);

impl Candle {
    pub fn close(&self) -> Decimal {
        self.4
    }
}

/// Complete portfolio payload served by `/stocks/portfolio`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Portfolio {
    pub total_value: Decimal,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub historical_data: Vec<Candle>,
    pub metrics: PortfolioMetrics,
}

/// A market index quote (S&P 500, NASDAQ, VIX, ...)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IndexQuote {
    pub name: String,
    pub value: Decimal,
    pub change_percent: Decimal,
}

/// Per-sector daily performance
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectorPerformance {
    pub sector: String,
    pub change_percent: Decimal,
}

/// Market overview served by `/stocks/market`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub indices: Vec<IndexQuote>,
    #[serde(default)]
    pub sectors: Vec<SectorPerformance>,
}

/// Expected market impact of a news item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum NewsImpact {
    Positive,
    Negative,
    Neutral,
}

/// One headline served by `/stocks/news`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub source: String,
    pub time: String,
    pub impact: NewsImpact,
}

/// Broker profile served by `/stocks/profile`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    #[serde(alias = "clientcode")]
    pub client_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Live quote for one instrument
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Quote {
    #[serde(default)]
    pub tradingsymbol: Option<String>,
    pub ltp: Decimal,
}

/// Login request body for `/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub client_id: String,
    pub password: String,
    pub totp: String,
}

/// Payload inside the login envelope
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// Payload inside the `/auth/verify` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedSession {
    pub client_id: String,
}

/// Backend liveness payload
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_portfolio_envelope_roundtrip() {
        let raw = serde_json::json!({
            "data": {
                "total_value": 15000,
                "holdings": [
                    {
                        "tradingsymbol": "TATAMOTORS",
                        "quantity": 55,
                        "averageprice": 861.01,
                        "ltp": 900.5,
                        "pnl": 2172.0
                    }
                ],
                "positions": [],
                "historical_data": [["2024-01-02T09:15:00", 100, 110, 95, 105, 12000]],
                "metrics": {
                    "daily_change": 0.8,
                    "total_investments": 47355.55,
                    "total_pl": 2172.0,
                    "daily_pl": 380.0
                }
            },
            "status": 200
        });

        let envelope: Envelope<Portfolio> = serde_json::from_value(raw).unwrap();
        let portfolio = envelope.data;
        assert_eq!(portfolio.total_value, dec!(15000));
        assert_eq!(portfolio.holdings[0].quantity, dec!(55));
        assert_eq!(portfolio.historical_data[0].close(), dec!(105));
        assert!(envelope.message.is_none());
    }

    #[test]
    fn test_holding_derived_values() {
        let holding = Holding {
            tradingsymbol: "HYUNDAI".to_string(),
            exchange: None,
            symboltoken: None,
            quantity: dec!(7),
            averageprice: dec!(1960),
            ltp: dec!(2000),
            pnl: dec!(280),
        };
        assert_eq!(holding.invested(), dec!(13720));
        assert_eq!(holding.current_value(), dec!(14000));
    }

    #[test]
    fn test_news_impact_variants() {
        let item: NewsItem = serde_json::from_value(serde_json::json!({
            "title": "Fed Signals Potential Rate Cuts",
            "source": "Financial Times",
            "time": "2 hours ago",
            "impact": "Positive"
        }))
        .unwrap();
        assert_eq!(item.impact, NewsImpact::Positive);
    }
}
