//! Weekly report worker
//!
//! Fetches a snapshot on the `REPORT_CRON` schedule, evaluates it and
//! delivers the rendered report. `REPORT_RUN_ONCE=1` runs a single cycle
//! and exits.

use dotenvy::dotenv;
use macrowatch::config::{self, Config};
use macrowatch::core::scheduler::ReportScheduler;
use macrowatch::logging;
use macrowatch::services::{provider_from_env, LogReportSink, ReportSink, StdoutReportSink};
use macrowatch::signals::SignalEngine;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let app_config = Config::from_env()?;
    let engine = Arc::new(SignalEngine::from_config(&app_config));
    let Some(provider) = provider_from_env()? else {
        error!("No snapshot source: set FRED_API_KEY or SNAPSHOT_OVERRIDES");
        return Err("no snapshot provider configured".into());
    };

    let run_once = env::var("REPORT_RUN_ONCE")
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    // One-shot runs print the report; scheduled runs log it.
    let sink: Arc<dyn ReportSink> = if run_once {
        Arc::new(StdoutReportSink)
    } else {
        Arc::new(LogReportSink)
    };

    let cron_expr = config::get_report_cron();
    let scheduler = ReportScheduler::new(&cron_expr, provider, engine, sink)?;

    if run_once {
        let report = scheduler.run_once().await?;
        info!(subject = %report.subject, "Report delivered");
        return Ok(());
    }

    info!(
        environment = %config::get_environment(),
        cron = %cron_expr,
        next_run = ?scheduler.next_run(),
        "Starting weekly report worker"
    );
    scheduler.start().await;

    signal::ctrl_c().await?;
    info!("Shutting down weekly report worker...");
    scheduler.stop().await;

    Ok(())
}
