//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and evaluation routes.


use macrowatch::models::indicators::{Indicator, Snapshot};
use serde_json::{json, Value};
use std::sync::Arc;

use test_utils::{TestApiServer, UnavailableProvider};

const ALLOCATION_CSV: &str = "Asset Class,Amount\nStocks,500000\nBonds,300000\nPrivate,100000\n";

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "macrowatch");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/health").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_requests_in_flight",
        "snapshot_evaluations_total",
        "allocation_comparisons_total",
    ] {
        assert!(body.contains(name), "Expected {name} metric");
    }
    assert_eq!(app.metrics.http_requests_total.get(), 2);
}

#[tokio::test]
async fn rules_endpoint_lists_rule_table_in_order() {
    let app = TestApiServer::new().await;
    let body: Value = app.server.get("/api/rules").await.json();
    let rules = body.as_array().unwrap();

    assert_eq!(rules.len(), 23);
    assert_eq!(rules[0]["label"], "VIX>20");
    assert_eq!(rules[0]["plan"], "MarketDynamics2025");
    assert_eq!(rules[22]["plan"], "ChinaSelloff");
}

#[tokio::test]
async fn evaluate_returns_results_plans_and_risk() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/signals/evaluate")
        .json(&json!({
            "vix": 25.0,
            "sp_price": 4000.0,
            "sp_ma200": 4300.0,
            "treasury_10y": 3.0,
            "treasury_3m": 5.0,
            "cpi_yoy": null
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["results"].as_array().unwrap().len(), 23);
    assert_eq!(body["results"][0]["status"], "ALERT");
    assert_eq!(body["risk"]["score"], 3);
    assert_eq!(body["risk"]["level"], "strong");
    assert_eq!(body["plans"]["Reentry"]["verdict"], "hold");

    let cpi_high = &body["results"][8];
    assert_eq!(cpi_high["status"], "UNKNOWN");
    assert_eq!(cpi_high["missing"], json!(["cpi_yoy"]));

    assert_eq!(app.metrics.snapshot_evaluations_total.get(), 1);
    assert_eq!(
        app.metrics
            .signal_alerts_total
            .with_label_values(&["MarketDynamics2025"])
            .get(),
        3
    );
}

#[tokio::test]
async fn evaluate_rejects_non_numeric_values() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/signals/evaluate")
        .json(&json!({ "vix": "elevated" }))
        .await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("vix"));
}

#[tokio::test]
async fn evaluate_rejects_unknown_indicator() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/signals/evaluate")
        .json(&json!({ "bitcoin": 100000.0 }))
        .await;
    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn signals_without_provider_is_unavailable() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/signals").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn signals_use_configured_provider() {
    let snapshot = Snapshot::new()
        .with(Indicator::Vix, 15.0)
        .unwrap()
        .with(Indicator::CpiYoy, 3.0)
        .unwrap();
    let app = TestApiServer::with_snapshot(snapshot).await;

    let body: Value = app.server.get("/api/signals").await.json();
    assert_eq!(body["plans"]["Reentry"]["score"], 2);
    assert_eq!(body["plans"]["Reentry"]["verdict"], "phased_reentry");
}

#[tokio::test]
async fn provider_failure_is_bad_gateway() {
    let app = TestApiServer::with_provider(Some(Arc::new(UnavailableProvider))).await;
    let response = app.server.get("/api/signals").await;
    assert_eq!(response.status_code(), 502);
}

#[tokio::test]
async fn plan_view_returns_only_that_plan() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/plans/reentry")
        .json(&json!({ "vix": 15.0, "sp_price": 4500.0, "sp_ma200": 4300.0 }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["view"], "signals");
    assert_eq!(body["plan"], "Reentry");
    assert_eq!(body["score"], 2);
    assert_eq!(body["unknown"], 2);
}

#[tokio::test]
async fn plan_view_counts_evaluation_and_alerts() {
    let app = TestApiServer::new().await;
    app.server
        .post("/api/plans/debt-crisis")
        .json(&json!({ "treasury_10y": 5.4, "cds_spread_bps": 90.0 }))
        .await
        .assert_status_ok();
    app.server
        .post("/api/plans/Allocation503020")
        .json(&json!({}))
        .await
        .assert_status_ok();

    assert_eq!(app.metrics.snapshot_evaluations_total.get(), 1);
    assert_eq!(
        app.metrics
            .signal_alerts_total
            .with_label_values(&["DebtCrisis"])
            .get(),
        2
    );
}

#[tokio::test]
async fn allocation_plan_view_carries_targets() {
    let app = TestApiServer::new().await;
    let body: Value = app
        .server
        .post("/api/plans/Allocation503020")
        .json(&json!({}))
        .await
        .json();
    assert_eq!(body["view"], "allocation");
    assert_eq!(body["targets"]["Bonds"], 30.0);
}

#[tokio::test]
async fn unknown_plan_is_not_found() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/plans/stagflation")
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn allocation_compare_annotates_rows() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/allocation/compare")
        .text(ALLOCATION_CSV)
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["aligned"], false);
    assert_eq!(body["rows"][0]["status"], "OFF_TARGET");
    assert_eq!(body["rows"][1]["status"], "OK");
    assert_eq!(body["rows"][2]["status"], "OFF_TARGET");
    assert_eq!(app.metrics.allocation_comparisons_total.get(), 1);
}

#[tokio::test]
async fn allocation_compare_honours_tolerance_query() {
    let app = TestApiServer::new().await;
    let body: Value = app
        .server
        .post("/api/allocation/compare")
        .add_query_param("tolerance", 10)
        .text(ALLOCATION_CSV)
        .await
        .json();
    assert_eq!(body["tolerance"], 10.0);
    assert_eq!(body["aligned"], true);
}

#[tokio::test]
async fn allocation_compare_rejects_empty_and_headerless_uploads() {
    let app = TestApiServer::new().await;

    let empty = app
        .server
        .post("/api/allocation/compare")
        .text("Asset Class,Amount\n")
        .await;
    assert_eq!(empty.status_code(), 422);

    let headerless = app
        .server
        .post("/api/allocation/compare")
        .text("Stocks,100\n")
        .await;
    assert_eq!(headerless.status_code(), 422);

    let negative = app
        .server
        .post("/api/allocation/compare")
        .add_query_param("tolerance", -1)
        .text(ALLOCATION_CSV)
        .await;
    assert_eq!(negative.status_code(), 422);
}
