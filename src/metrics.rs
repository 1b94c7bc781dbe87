//! Prometheus metrics for the HTTP service

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::models::plan::Plan;

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub snapshot_evaluations_total: IntCounter,
    pub signal_alerts_total: IntCounterVec,
    pub allocation_comparisons_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let snapshot_evaluations_total = IntCounter::new(
            "snapshot_evaluations_total",
            "Snapshots evaluated against the rule set",
        )?;
        let signal_alerts_total = IntCounterVec::new(
            Opts::new("signal_alerts_total", "Rules in alert, by owning plan"),
            &["plan"],
        )?;
        let allocation_comparisons_total = IntCounter::new(
            "allocation_comparisons_total",
            "Allocation tables compared against targets",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(snapshot_evaluations_total.clone()))?;
        registry.register(Box::new(signal_alerts_total.clone()))?;
        registry.register(Box::new(allocation_comparisons_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            snapshot_evaluations_total,
            signal_alerts_total,
            allocation_comparisons_total,
        })
    }

    pub fn record_alert(&self, plan: Plan) {
        self.signal_alerts_total
            .with_label_values(&[plan.as_str()])
            .inc();
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
