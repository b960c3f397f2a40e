//! Real server on a loopback port + the reqwest transport.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::json;

use coinlens_rs::api::{self, active_coins::ACTIVE_COINS_FILE, AppState};
use coinlens_rs::market_data::adapters::http::HttpTransport;
use coinlens_rs::market_data::state::LOAD_FAILED_MESSAGE;
use coinlens_rs::market_data::{Endpoints, MarketDataClient};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn write_data_file(root: &Path, contents: &str) {
    let path = root.join(ACTIVE_COINS_FILE);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Data Endpoint plus a stand-in for the external ranking endpoint.
fn app_with_top100(root: &Path, top100_status: StatusCode) -> Router {
    let top100 = Router::new().route(
        "/api/coinmarketcap/top100",
        get(move || async move {
            let body = json!({
                "success": true,
                "data": {
                    "coins": [
                        {"id": 1, "name": "Bitcoin", "symbol": "BTC", "cmc_rank": 1, "is_active": 1}
                    ],
                    "timestamp": 1704067200000_i64
                }
            });
            (top100_status, axum::Json(body))
        }),
    );
    api::app(AppState::new(root)).merge(top100)
}

async fn client_for(addr: SocketAddr) -> Arc<MarketDataClient> {
    let transport = Arc::new(HttpTransport::new(&format!("http://{addr}")).unwrap());
    Arc::new(MarketDataClient::new(transport, Endpoints::default()))
}

#[tokio::test]
async fn test_client_against_real_server() {
    let dir = tempfile::tempdir().unwrap();
    write_data_file(
        dir.path(),
        r#"{"timestamp":"2024-01-01T00:00:00Z","total":1,"symbols":["BTC"]}"#,
    );
    let addr = serve(app_with_top100(dir.path(), StatusCode::OK)).await;

    let client = client_for(addr).await;
    client.spawn_load();
    let state = client.settled().await;

    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert!(state.api_key_configured);
    assert!(client.is_top100_coin("btc"));
    assert!(client.is_active_coin("BTC"));
    assert!(client.has_active_data());
    assert_eq!(state.active_coins.unwrap().timestamp, 1_704_067_200_000);
}

#[tokio::test]
async fn test_missing_file_means_no_active_data() {
    let dir = tempfile::tempdir().unwrap();
    let addr = serve(app_with_top100(dir.path(), StatusCode::OK)).await;

    let client = client_for(addr).await;
    client.load().await;

    let state = client.state();
    assert_eq!(state.error, None);
    assert!(!state.has_active_data());
    // empty list loaded: nothing counts as active
    assert!(!client.is_active_coin("BTC"));
    assert!(client.is_top100_coin("BTC"));
}

#[tokio::test]
async fn test_upstream_500_surfaces_generic_error() {
    let dir = tempfile::tempdir().unwrap();
    let addr = serve(app_with_top100(dir.path(), StatusCode::INTERNAL_SERVER_ERROR)).await;

    let client = client_for(addr).await;
    client.load().await;

    let state = client.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(LOAD_FAILED_MESSAGE));
    assert_eq!(
        state.error_detail.as_deref(),
        Some("HTTP error! status: 500 / 200")
    );
}

#[tokio::test]
async fn test_unreachable_server() {
    // Bind then drop to get a port nobody is listening on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let client = client_for(addr).await;
    client.load().await;

    let state = client.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(LOAD_FAILED_MESSAGE));
    assert!(client.is_top100_coin("ANY"));
}
