//! Allocation table rows before and after comparison against targets.

use serde::{Deserialize, Serialize};

/// Raw uploaded row; the amount is kept as text until comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationInput {
    pub asset_class: String,
    pub amount: String,
}

impl AllocationInput {
    pub fn new(asset_class: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            asset_class: asset_class.into(),
            amount: amount.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStatus {
    Ok,
    OffTarget,
    /// Asset class has no target percentage.
    Unknown,
}

impl AllocationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AllocationStatus::Ok => "✅ OK",
            AllocationStatus::OffTarget => "⚠️ Off Target",
            AllocationStatus::Unknown => "❔ No Target",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub asset_class: String,
    pub amount: f64,
    pub current_pct: f64,
    pub target_pct: Option<f64>,
    pub deviation: Option<f64>,
    pub status: AllocationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub rows: Vec<AllocationRow>,
    pub total: f64,
    pub tolerance: f64,
    /// Rows dropped because their amount did not parse.
    pub skipped_rows: usize,
    /// No row is off target.
    pub aligned: bool,
}
