//! FRED snapshot provider against a mocked FRED API

use backon::ExponentialBuilder;
use macrowatch::error::ProviderError;
use macrowatch::models::indicators::Indicator;
use macrowatch::services::{FredClient, FredSnapshotProvider, SnapshotProvider};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OBSERVATIONS_PATH: &str = "/fred/series/observations";

fn observations(values: &[&str]) -> serde_json::Value {
    let observations: Vec<_> = values
        .iter()
        .enumerate()
        .map(|(i, value)| json!({ "date": format!("2025-01-{:02}", (i % 28) + 1), "value": value }))
        .collect();
    json!({ "observations": observations })
}

async fn mock_series(server: &MockServer, series_id: &str, values: &[&str]) {
    Mock::given(method("GET"))
        .and(path(OBSERVATIONS_PATH))
        .and(query_param("series_id", series_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(observations(values)))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> FredClient {
    FredClient::new(server.uri(), "test-key")
        .unwrap()
        .with_backoff(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(1))
                .with_max_delay(Duration::from_millis(5))
                .with_max_times(2),
        )
}

#[tokio::test]
async fn observations_skip_missing_markers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OBSERVATIONS_PATH))
        .and(query_param("series_id", "DGS10"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("file_type", "json"))
        .and(query_param("sort_order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(observations(&["4.41", ".", "4.38"])))
        .mount(&server)
        .await;

    let values = client(&server).observations("DGS10", 6).await.unwrap();
    assert_eq!(values, vec![4.41, 4.38]);
}

#[tokio::test]
async fn retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OBSERVATIONS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mock_series(&server, "VIXCLS", &["17.2"]).await;

    let values = client(&server).observations("VIXCLS", 6).await.unwrap();
    assert_eq!(values, vec![17.2]);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OBSERVATIONS_PATH))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).observations("VIXCLS", 6).await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 400, .. }));
}

#[tokio::test]
async fn snapshot_maps_series_to_indicators() {
    let server = MockServer::start().await;

    let sp: Vec<String> = (0..200).map(|i| format!("{}", 5000 - i)).collect();
    let sp: Vec<&str> = sp.iter().map(String::as_str).collect();
    // 13 monthly CPI index values, newest first: +4% over the year.
    let cpi: Vec<&str> = std::iter::once("312.0")
        .chain(std::iter::repeat("305.0").take(11))
        .chain(std::iter::once("300.0"))
        .collect();

    mock_series(&server, "VIXCLS", &["22.5", "21.0"]).await;
    mock_series(&server, "SP500", &sp).await;
    mock_series(&server, "DGS10", &["4.5"]).await;
    mock_series(&server, "DGS3MO", &[".", "4.0"]).await;
    mock_series(&server, "CPIAUCSL", &cpi).await;
    mock_series(&server, "BAMLH0A0HYM2", &["3.25"]).await;
    mock_series(&server, "A191RL1Q225SBEA", &["-0.5"]).await;
    // USSLIND and DTWEXBGS are left unmocked and answer 404.

    let provider = FredSnapshotProvider::new(client(&server));
    let snapshot = provider.fetch_snapshot().await.unwrap();

    assert_eq!(snapshot.get(Indicator::Vix), Some(22.5));
    assert_eq!(snapshot.get(Indicator::SpPrice), Some(5000.0));
    assert_eq!(snapshot.get(Indicator::SpMa200), Some(4900.5));
    assert_eq!(snapshot.get(Indicator::Treasury10y), Some(4.5));
    assert_eq!(snapshot.get(Indicator::Treasury3m), Some(4.0));
    assert!((snapshot.get(Indicator::CpiYoy).unwrap() - 4.0).abs() < 1e-9);
    assert_eq!(snapshot.get(Indicator::HyOasBps), Some(325.0));
    assert_eq!(snapshot.get(Indicator::GdpGrowth), Some(-0.5));

    assert!(!snapshot.contains(Indicator::Lei));
    assert!(!snapshot.contains(Indicator::Dxy3moChangePct));
    assert!(!snapshot.contains(Indicator::CdsSpreadBps));
}

#[tokio::test]
async fn short_history_leaves_derived_indicator_unknown() {
    let server = MockServer::start().await;
    mock_series(&server, "SP500", &["5000", "4990", "4980"]).await;

    let snapshot = FredSnapshotProvider::new(client(&server))
        .fetch_snapshot()
        .await
        .unwrap();
    assert_eq!(snapshot.get(Indicator::SpPrice), Some(5000.0));
    assert!(!snapshot.contains(Indicator::SpMa200));
}
