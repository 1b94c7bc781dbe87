//! Combined risk score over the three canonical adverse conditions.
//!
//! Separate from per-plan scoring: it always reads the same three rules
//! regardless of which plan owns them.

use serde::{Deserialize, Serialize};

use crate::models::signal::{SignalResult, SignalStatus};
use crate::strategies::rules::ids;

pub const RISK_RULES: [&str; 3] = [ids::VIX_ELEVATED, ids::SP_BELOW_MA200, ids::CURVE_INVERTED];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    NoMajorSignals,
    EarlyWarning,
    Moderate,
    Strong,
}

impl RiskLevel {
    pub fn from_score(score: usize) -> Self {
        match score {
            0 => RiskLevel::NoMajorSignals,
            1 => RiskLevel::EarlyWarning,
            2 => RiskLevel::Moderate,
            _ => RiskLevel::Strong,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RiskLevel::Strong => "🚨 STRONG SIGNAL: Execute full defensive reallocation",
            RiskLevel::Moderate => {
                "⚠️ MODERATE SIGNAL: Begin phased allocation shift + tax strategy"
            }
            RiskLevel::EarlyWarning => "🟡 Early Warning: Monitor indicators daily",
            RiskLevel::NoMajorSignals => {
                "🟢 No major risk signals. Maintain current positioning"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: usize,
    pub max_score: usize,
    /// Canonical rules that could not be evaluated.
    pub unknown: usize,
    pub level: RiskLevel,
    pub triggered: Vec<String>,
}

/// Count how many canonical risk rules are in alert.
pub fn risk_score(results: &[SignalResult]) -> RiskAssessment {
    let canonical: Vec<&SignalResult> = RISK_RULES
        .iter()
        .filter_map(|id| results.iter().find(|r| r.rule_id == *id))
        .collect();

    let triggered: Vec<String> = canonical
        .iter()
        .filter(|r| r.status == SignalStatus::Alert)
        .map(|r| r.label.clone())
        .collect();
    let unknown = RISK_RULES.len()
        - canonical
            .iter()
            .filter(|r| r.status != SignalStatus::Unknown)
            .count();
    let score = triggered.len();

    RiskAssessment {
        score,
        max_score: RISK_RULES.len(),
        unknown,
        level: RiskLevel::from_score(score),
        triggered,
    }
}
