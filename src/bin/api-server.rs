//! Macrowatch API Server
//!
//! HTTP API for snapshot evaluation, plan views and allocation comparison,
//! plus health and Prometheus metrics.

use dotenvy::dotenv;
use macrowatch::config::{self, Config};
use macrowatch::core::http::start_server;
use macrowatch::logging;
use macrowatch::services::provider_from_env;
use macrowatch::signals::SignalEngine;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let port = config::get_port();
    let app_config = Config::from_env()?;
    let engine = Arc::new(SignalEngine::from_config(&app_config));
    let provider = provider_from_env()?;

    info!("Starting Macrowatch API Server");
    info!(environment = %config::get_environment(), "Environment");
    info!(port = port, rules = engine.rules().len(), "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, engine, provider).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
