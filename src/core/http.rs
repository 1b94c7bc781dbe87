//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::allocation::{parse_allocation_csv, AllocationComparator};
use crate::metrics::Metrics;
use crate::models::allocation::AllocationReport;
use crate::models::indicators::Snapshot;
use crate::models::plan::Plan;
use crate::models::strategy::Rule;
use crate::services::market_data::SnapshotProvider;
use crate::signals::engine::{PlanView, SignalEngine, SignalReport};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub engine: Arc<SignalEngine>,
    pub provider: Option<Arc<dyn SnapshotProvider>>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Error body `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn unprocessable(message: impl ToString) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "macrowatch"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Body values must be numbers or null; anything else is rejected here
/// rather than by the extractor so the error names the indicator.
fn parse_snapshot(raw: Value) -> Result<Snapshot, ApiError> {
    serde_json::from_value(raw).map_err(ApiError::unprocessable)
}

fn evaluate_and_record(state: &AppState, snapshot: &Snapshot) -> SignalReport {
    let report = state.engine.evaluate(snapshot);
    state.metrics.snapshot_evaluations_total.inc();
    for alert in report.alerts() {
        state.metrics.record_alert(alert.plan);
    }
    report
}

/// The active rule table, in evaluation order
async fn list_rules(State(state): State<AppState>) -> Json<Vec<Rule>> {
    Json(state.engine.rules().rules().to_vec())
}

/// Evaluate a posted snapshot
async fn evaluate_snapshot(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Result<Json<SignalReport>, ApiError> {
    let snapshot = parse_snapshot(raw)?;
    let report = evaluate_and_record(&state, &snapshot);
    info!(
        alerts = report.alerts().count(),
        unknown = report.unknown().count(),
        risk = report.risk.score,
        "Evaluated posted snapshot"
    );
    Ok(Json(report))
}

/// Fetch from the configured provider and evaluate
async fn current_signals(State(state): State<AppState>) -> Result<Json<SignalReport>, ApiError> {
    let provider = state.provider.as_ref().ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "no snapshot provider configured",
        )
    })?;

    let snapshot = provider.fetch_snapshot().await.map_err(|e| {
        error!(error = %e, "Snapshot provider failed");
        ApiError::new(StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    Ok(Json(evaluate_and_record(&state, &snapshot)))
}

/// One plan's view of a posted snapshot
async fn plan_view(
    State(state): State<AppState>,
    Path(plan): Path<String>,
    Json(raw): Json<Value>,
) -> Result<Json<PlanView>, ApiError> {
    let plan = plan
        .parse::<Plan>()
        .map_err(|e| ApiError::new(StatusCode::NOT_FOUND, e.to_string()))?;
    let snapshot = parse_snapshot(raw)?;
    let view = state.engine.plan_view(plan, &snapshot);
    if let PlanView::Signals(summary) = &view {
        state.metrics.snapshot_evaluations_total.inc();
        for alert in summary.results.iter().filter(|r| r.is_alert()) {
            state.metrics.record_alert(alert.plan);
        }
    }
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
struct CompareQuery {
    tolerance: Option<f64>,
}

/// Compare an `Asset Class,Amount` CSV body against the configured targets
async fn compare_allocation(
    State(state): State<AppState>,
    Query(params): Query<CompareQuery>,
    body: String,
) -> Result<Json<AllocationReport>, ApiError> {
    let mut comparator = AllocationComparator::from_config(state.engine.allocation());
    if let Some(tolerance) = params.tolerance {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ApiError::unprocessable(format!(
                "tolerance must be a non-negative number, got {tolerance}"
            )));
        }
        comparator = comparator.with_tolerance(tolerance);
    }

    let rows = parse_allocation_csv(&body).map_err(ApiError::unprocessable)?;
    let report = comparator.compare(&rows).map_err(|e| {
        warn!(error = %e, "Allocation comparison rejected");
        ApiError::unprocessable(e)
    })?;
    state.metrics.allocation_comparisons_total.inc();

    Ok(Json(report))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/rules", get(list_rules))
        .route("/api/signals", get(current_signals))
        .route("/api/signals/evaluate", post(evaluate_snapshot))
        .route("/api/plans/{plan}", post(plan_view))
        .route("/api/allocation/compare", post(compare_allocation))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    engine: Arc<SignalEngine>,
    provider: Option<Arc<dyn SnapshotProvider>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let metrics = Arc::new(Metrics::new()?);

    if provider.is_none() {
        warn!("No snapshot provider configured - GET /api/signals will return 503");
    }

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        engine,
        provider,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
