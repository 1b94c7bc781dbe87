//! Tracing subscriber setup shared by the CLI and both services.
//!
//! With `ENVIRONMENT=production` events are JSON lines on stdout for the log
//! collector. Everywhere else they are colored lines on stderr, leaving
//! stdout to the CLI's tables and JSON output so it can be piped.

use crate::config::is_production;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (json, human) = if is_production() {
        let layer = fmt::layer()
            .json()
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stdout);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .with_ansi(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(human)
        .init();
}
