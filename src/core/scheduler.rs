//! Cron-based scheduler for the weekly signal report

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::error::SchedulerError;
use crate::reports::{render_email, EmailReport};
use crate::services::market_data::SnapshotProvider;
use crate::services::sink::ReportSink;
use crate::signals::engine::SignalEngine;

/// Fetch, evaluate, render and deliver on every cron tick.
pub struct ReportScheduler {
    schedule: Schedule,
    provider: Arc<dyn SnapshotProvider>,
    engine: Arc<SignalEngine>,
    sink: Arc<dyn ReportSink>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl ReportScheduler {
    /// `cron_expr` uses the seven-field `sec min hour dom month dow year` form.
    pub fn new(
        cron_expr: &str,
        provider: Arc<dyn SnapshotProvider>,
        engine: Arc<SignalEngine>,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self, SchedulerError> {
        let schedule =
            Schedule::from_str(cron_expr).map_err(|e| SchedulerError::InvalidSchedule {
                expr: cron_expr.to_string(),
                details: e.to_string(),
            })?;

        info!(cron = %cron_expr, "ReportScheduler: created");

        Ok(Self {
            schedule,
            provider,
            engine,
            sink,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        self.schedule.upcoming(Utc).next()
    }

    /// One fetch-evaluate-deliver cycle, outside the schedule.
    pub async fn run_once(&self) -> Result<EmailReport, SchedulerError> {
        run_cycle(
            self.provider.as_ref(),
            &self.engine,
            self.sink.as_ref(),
            Utc::now(),
        )
        .await
    }

    /// Start the scheduler
    pub async fn start(&self) {
        let schedule = self.schedule.clone();
        let provider = self.provider.clone();
        let engine = self.engine.clone();
        let sink = self.sink.clone();

        let handle = tokio::spawn(async move {
            info!("ReportScheduler: started, waiting for cron schedule...");

            loop {
                let Some(next_tick) = schedule.upcoming(Utc).next() else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                };
                let now = Utc::now();
                if next_tick > now {
                    let duration = (next_tick - now).to_std().unwrap_or_default();
                    tokio::time::sleep(duration).await;
                }

                match run_cycle(provider.as_ref(), &engine, sink.as_ref(), next_tick).await {
                    Ok(report) => info!(subject = %report.subject, "ReportScheduler: report delivered"),
                    Err(e) => error!(error = %e, "ReportScheduler: report cycle failed"),
                }
            }
        });

        let mut slot = self.handle.write().await;
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("ReportScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

async fn run_cycle(
    provider: &dyn SnapshotProvider,
    engine: &SignalEngine,
    sink: &dyn ReportSink,
    as_of: DateTime<Utc>,
) -> Result<EmailReport, SchedulerError> {
    let snapshot = provider.fetch_snapshot().await?;
    let report = engine.evaluate(&snapshot);
    info!(
        alerts = report.alerts().count(),
        unknown = report.unknown().count(),
        risk = report.risk.score,
        "ReportScheduler: snapshot evaluated"
    );

    let email = render_email(&report, as_of);
    sink.deliver(&email).await?;
    Ok(email)
}
