//! Synchronizer behavior: immediate first fetch, stale preservation,
//! fan-out cycles, teardown safety

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use serde_json::json;
use tokio::sync::Notify;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use findash::api::types::{Holding, Portfolio, Position};
use findash::api::{stocks, ApiClient, ApiError};
use findash::config::ApiConfig;
use findash::session::SessionStore;
use findash::sync::{self, FetchCycle, SharedViewState};

fn portfolio_body(total_value: i64) -> serde_json::Value {
    json!({
        "data": {
            "total_value": total_value,
            "holdings": [],
            "positions": [],
            "historical_data": [],
            "metrics": {
                "daily_change": 0.5,
                "total_investments": 10000,
                "total_pl": 500,
                "daily_pl": 50
            }
        },
        "status": 200
    })
}

fn client_for(server: &MockServer, timeout: Duration) -> Arc<ApiClient> {
    let session = Arc::new(SessionStore::in_memory());
    let config = ApiConfig::default()
        .with_base_url(server.uri())
        .with_request_timeout(timeout);
    Arc::new(ApiClient::new(&config, session).unwrap())
}

struct PortfolioCycle {
    client: Arc<ApiClient>,
}

#[async_trait]
impl FetchCycle for PortfolioCycle {
    type Output = Portfolio;

    async fn fetch(&self) -> Result<Portfolio, ApiError> {
        stocks::portfolio(&self.client).await
    }
}

/// Wait until the predicate holds, failing the test after the deadline
async fn wait_for<T, F>(state: &SharedViewState<T>, deadline: Duration, predicate: F)
where
    T: Send + Sync,
    F: Fn(&findash::sync::ViewState<T>) -> bool,
{
    let result = tokio::time::timeout(deadline, async {
        loop {
            if predicate(&*state.read().await) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(result.is_ok(), "condition not reached within {:?}", deadline);
}

#[tokio::test]
async fn test_immediate_first_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stocks/portfolio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(portfolio_body(15000)))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    // Interval far in the future: the only way the value appears quickly is
    // the activation-time fetch
    let (state, handle) = sync::spawn("test", Duration::from_secs(60), PortfolioCycle { client });

    wait_for(&state, Duration::from_secs(2), |view| view.value.is_some()).await;

    let view = state.read().await.clone();
    assert_eq!(view.value.unwrap().total_value, dec!(15000));
    assert!(view.error.is_none());
    assert!(!view.loading);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_failing_cycle_preserves_last_good_value() {
    let server = MockServer::start().await;
    // One good response, then the endpoint starts stalling past the client
    // timeout
    Mock::given(method("GET"))
        .and(path("/stocks/portfolio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(portfolio_body(15000)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stocks/portfolio"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(portfolio_body(99999))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_millis(100));
    let (state, handle) = sync::spawn("test", Duration::from_millis(50), PortfolioCycle { client });

    wait_for(&state, Duration::from_secs(2), |view| view.value.is_some()).await;
    let first = state.read().await.value.clone().unwrap();

    wait_for(&state, Duration::from_secs(5), |view| view.error.is_some()).await;

    let view = state.read().await.clone();
    assert_eq!(view.error.as_deref(), Some("request timed out"));
    assert_eq!(view.value.unwrap(), first);
    assert!(!view.loading);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_error_cleared_after_recovery() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stocks/portfolio"))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stocks/portfolio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(portfolio_body(15000)))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let (state, handle) = sync::spawn("test", Duration::from_millis(50), PortfolioCycle { client });

    wait_for(&state, Duration::from_secs(2), |view| view.error.is_some()).await;
    wait_for(&state, Duration::from_secs(2), |view| view.value.is_some()).await;

    let view = state.read().await.clone();
    assert!(view.error.is_none());
    assert_eq!(view.value.unwrap().total_value, dec!(15000));

    handle.shutdown().await;
}

/// A page needing two resources fails as a unit when either fetch fails
struct HoldingsPositionsCycle {
    client: Arc<ApiClient>,
}

#[async_trait]
impl FetchCycle for HoldingsPositionsCycle {
    type Output = (Vec<Holding>, Vec<Position>);

    async fn fetch(&self) -> Result<Self::Output, ApiError> {
        tokio::try_join!(
            stocks::holdings(&self.client),
            stocks::positions(&self.client)
        )
    }
}

#[tokio::test]
async fn test_fan_out_cycle_fails_as_a_unit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stocks/holdings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "tradingsymbol": "HYUNDAI",
                    "quantity": 7,
                    "averageprice": 1960,
                    "ltp": 2000,
                    "pnl": 280
                }
            ],
            "status": 200
        })))
        .mount(&server)
        .await;
    // Positions endpoint fails once, then recovers
    Mock::given(method("GET"))
        .and(path("/stocks/positions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stocks/positions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [], "status": 200})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    // A generous interval keeps the first-cycle assertions well clear of the
    // second cycle
    let (state, handle) = sync::spawn(
        "portfolio",
        Duration::from_millis(200),
        HoldingsPositionsCycle { client },
    );

    // First cycle: holdings resolved but the cycle failed, so no value is
    // surfaced
    wait_for(&state, Duration::from_secs(2), |view| view.error.is_some()).await;
    assert!(state.read().await.value.is_none());

    // Second cycle: both resources resolve
    wait_for(&state, Duration::from_secs(2), |view| view.value.is_some()).await;
    let (holdings, positions) = state.read().await.value.clone().unwrap();
    assert_eq!(holdings.len(), 1);
    assert!(positions.is_empty());

    handle.shutdown().await;
}

/// Cycle that parks in-flight until released, so tests can deactivate the
/// poller mid-fetch
struct GatedCycle {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl FetchCycle for GatedCycle {
    type Output = u32;

    async fn fetch(&self) -> Result<u32, ApiError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(7)
    }
}

#[tokio::test]
async fn test_result_arriving_after_deactivation_is_discarded() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());

    let (state, handle) = sync::spawn(
        "test",
        Duration::from_secs(60),
        GatedCycle {
            entered: entered.clone(),
            release: release.clone(),
        },
    );

    // Wait until the first cycle is in flight, then deactivate
    entered.notified().await;
    handle.stop();

    // Let the in-flight fetch complete; its successful result must not
    // touch the view state
    release.notify_one();
    handle.shutdown().await;

    let view = state.read().await.clone();
    assert!(view.value.is_none());
    assert!(view.error.is_none());
    assert!(view.loading);
}
