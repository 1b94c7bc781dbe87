//! Destinations for the rendered weekly report.

use async_trait::async_trait;
use std::io::Write;
use tracing::info;

use crate::error::SinkError;
use crate::reports::EmailReport;

#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn deliver(&self, report: &EmailReport) -> Result<(), SinkError>;
}

/// Emits the report through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LogReportSink;

#[async_trait]
impl ReportSink for LogReportSink {
    async fn deliver(&self, report: &EmailReport) -> Result<(), SinkError> {
        info!(subject = %report.subject, body = %report.body, "Weekly report ready");
        Ok(())
    }
}

/// Prints subject and body to stdout.
#[derive(Debug, Clone, Default)]
pub struct StdoutReportSink;

#[async_trait]
impl ReportSink for StdoutReportSink {
    async fn deliver(&self, report: &EmailReport) -> Result<(), SinkError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Subject: {}\n\n{}", report.subject, report.body)?;
        stdout.flush()?;
        Ok(())
    }
}
