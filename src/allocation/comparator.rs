//! Compare an uploaded allocation against target percentages.

use std::collections::BTreeMap;

use crate::config::AllocationConfig;
use crate::error::AllocationError;
use crate::models::allocation::{
    AllocationInput, AllocationReport, AllocationRow, AllocationStatus,
};

pub const DEFAULT_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationComparator {
    targets: BTreeMap<String, f64>,
    tolerance: f64,
}

impl AllocationComparator {
    pub fn new(targets: BTreeMap<String, f64>, tolerance: f64) -> Self {
        Self { targets, tolerance }
    }

    pub fn from_config(config: &AllocationConfig) -> Self {
        Self::new(config.targets.clone(), config.tolerance)
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Annotate rows in input order. Unparseable amounts are dropped and
    /// counted; asset classes without a target get `Unknown` status.
    pub fn compare(&self, rows: &[AllocationInput]) -> Result<AllocationReport, AllocationError> {
        let valid: Vec<(&str, f64)> = rows
            .iter()
            .filter_map(|row| parse_amount(&row.amount).map(|a| (row.asset_class.trim(), a)))
            .collect();
        let skipped_rows = rows.len() - valid.len();

        let total: f64 = valid.iter().map(|(_, amount)| amount).sum();
        if valid.is_empty() || total <= 0.0 {
            return Err(AllocationError::EmptyInput { skipped_rows });
        }
        if !total.is_finite() {
            return Err(AllocationError::TotalOverflow);
        }

        let rows: Vec<AllocationRow> = valid
            .into_iter()
            .map(|(asset_class, amount)| self.annotate(asset_class, amount, total))
            .collect();
        let aligned = rows
            .iter()
            .all(|row| row.status != AllocationStatus::OffTarget);

        Ok(AllocationReport {
            rows,
            total,
            tolerance: self.tolerance,
            skipped_rows,
            aligned,
        })
    }

    fn annotate(&self, asset_class: &str, amount: f64, total: f64) -> AllocationRow {
        let current_pct = amount / total * 100.0;
        let target_pct = self.targets.get(asset_class).copied();
        let deviation = target_pct.map(|target| current_pct - target);
        let status = match deviation {
            Some(d) if d.abs() <= self.tolerance => AllocationStatus::Ok,
            Some(_) => AllocationStatus::OffTarget,
            None => AllocationStatus::Unknown,
        };

        AllocationRow {
            asset_class: asset_class.to_string(),
            amount,
            current_pct,
            target_pct,
            deviation,
            status,
        }
    }
}

impl Default for AllocationComparator {
    fn default() -> Self {
        Self::from_config(&AllocationConfig::default())
    }
}

/// Non-negative finite number, or `None`.
fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}
