//! Strategic plans that own rules and scoring policies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Plan {
    MarketDynamics2025,
    TaxDefensive,
    Reentry,
    DebtCrisis,
    ChinaSelloff,
    TradeShift,
    Allocation503020,
}

/// How a plan turns its signal results into a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// Count of alerts; any alert activates the plan.
    AlertCount,
    /// Count of favorable conditions against the re-entry ladder.
    Readiness,
    /// Plan has no signal rules (allocation comparison only).
    NotScored,
}

impl Plan {
    pub const ALL: [Plan; 7] = [
        Plan::MarketDynamics2025,
        Plan::TaxDefensive,
        Plan::Reentry,
        Plan::DebtCrisis,
        Plan::ChinaSelloff,
        Plan::TradeShift,
        Plan::Allocation503020,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::MarketDynamics2025 => "MarketDynamics2025",
            Plan::TaxDefensive => "TaxDefensive",
            Plan::Reentry => "Reentry",
            Plan::DebtCrisis => "DebtCrisis",
            Plan::ChinaSelloff => "ChinaSelloff",
            Plan::TradeShift => "TradeShift",
            Plan::Allocation503020 => "Allocation503020",
        }
    }

    /// Human-facing title used by renderers.
    pub fn title(&self) -> &'static str {
        match self {
            Plan::MarketDynamics2025 => "📘 2025 Market Dynamics Plan",
            Plan::TaxDefensive => "📙 Tax-Sensitive Defensive Plan",
            Plan::Reentry => "📗 Re-entry Plan",
            Plan::DebtCrisis => "🇺🇸 U.S.A. Debt Crisis Plan",
            Plan::ChinaSelloff => "🇨🇳 China Treasury Selloff Monitor",
            Plan::TradeShift => "🌍 Trade Regime Shift Tracker",
            Plan::Allocation503020 => "📐 50/30/20 Plan",
        }
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        match self {
            Plan::Reentry => ScoringPolicy::Readiness,
            Plan::Allocation503020 => ScoringPolicy::NotScored,
            Plan::MarketDynamics2025
            | Plan::TaxDefensive
            | Plan::DebtCrisis
            | Plan::ChinaSelloff
            | Plan::TradeShift => ScoringPolicy::AlertCount,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = UnknownPlan;

    /// Accepts the identifier in any case, with or without separators
    /// (`Reentry`, `reentry`, `tax-defensive`, `tax_defensive`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Plan::ALL
            .iter()
            .copied()
            .find(|plan| plan.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| UnknownPlan(s.to_string()))
    }
}
