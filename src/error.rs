//! Typed failures surfaced by the engine and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::indicators::Indicator;

/// Rejection of a snapshot at load time. Evaluation itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("indicator {indicator} has non-numeric value {value:?}")]
    InvalidNumericInput { indicator: Indicator, value: String },
    #[error("unknown indicator {0:?}")]
    UnknownIndicator(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown plan {0:?}")]
pub struct UnknownPlan(pub String);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("no valid allocation rows ({skipped_rows} skipped) or zero total")]
    EmptyInput { skipped_rows: usize },
    #[error("allocation amounts sum beyond the representable range")]
    TotalOverflow,
    #[error("allocation table must start with an `Asset Class,Amount` header")]
    MissingHeader,
    #[error("line {line}: expected two columns")]
    MalformedRow { line: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("configuration invalid: {0}")]
    Validation(String),
}

/// Failure of an external snapshot source.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {series} failed: {source}")]
    Http {
        series: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{series} returned HTTP {status}")]
    Status { series: String, status: u16 },
    #[error("could not decode {series}: {details}")]
    Decode { series: String, details: String },
    #[error("unable to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl ProviderError {
    /// Transport failures and 408/429/5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Http { source, .. } => source.is_timeout() || source.is_connect(),
            ProviderError::Status { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid cron expression {expr:?}: {details}")]
    InvalidSchedule { expr: String, details: String },
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
