use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signals::engine::SignalReport;

use super::tables::{render_risk, status_cell};

pub const SUBJECT_PREFIX: &str = "📬 Weekly Market Signal Report";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailReport {
    pub subject: String,
    pub body: String,
}

/// Plain-text weekly report: one block per signal, then the risk summary.
pub fn render_email(report: &SignalReport, as_of: DateTime<Utc>) -> EmailReport {
    let mut blocks: Vec<String> = report
        .results
        .iter()
        .map(|r| {
            format!(
                "{} {} — {}\nAction: {}",
                status_cell(r),
                r.detail,
                r.plan.title(),
                r.action
            )
        })
        .collect();
    blocks.push(render_risk(&report.risk));

    EmailReport {
        subject: format!("{} – {}", SUBJECT_PREFIX, as_of.format("%Y-%m-%d")),
        body: blocks.join("\n\n"),
    }
}
