//! Plan-level aggregation of signal results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::plan::{Plan, ScoringPolicy};
use crate::models::signal::SignalResult;

/// Score cutoff for a phased re-entry.
pub const PHASED_REENTRY_MIN: usize = 2;

/// Outcome of a plan's scoring policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanVerdict {
    Active,
    Clear,
    FullReentry,
    PhasedReentry,
    Hold,
}

impl PlanVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            PlanVerdict::Active => "active",
            PlanVerdict::Clear => "clear",
            PlanVerdict::FullReentry => "full re-entry",
            PlanVerdict::PhasedReentry => "phased re-entry",
            PlanVerdict::Hold => "hold",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PlanVerdict::Active => "⚠️ Signals triggered: review suggested actions",
            PlanVerdict::Clear => "🟢 No signals triggered",
            PlanVerdict::FullReentry => "🔁 All clear: Begin full portfolio re-entry",
            PlanVerdict::PhasedReentry => "🟡 Consider phased re-entry, monitor remaining signals",
            PlanVerdict::Hold => "🔒 Re-entry not yet advised, hold position",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan: Plan,
    pub results: Vec<SignalResult>,
    /// Alert count, or readiness for the re-entry plan.
    pub score: usize,
    pub max_score: usize,
    pub unknown: usize,
    pub verdict: PlanVerdict,
}

pub struct PlanAggregator;

impl PlanAggregator {
    /// Group results by owning plan, preserving rule order within each plan.
    pub fn aggregate(results: &[SignalResult]) -> BTreeMap<Plan, PlanSummary> {
        let mut grouped: BTreeMap<Plan, Vec<SignalResult>> = BTreeMap::new();
        for result in results {
            grouped.entry(result.plan).or_default().push(result.clone());
        }

        grouped
            .into_iter()
            .map(|(plan, results)| (plan, Self::summarize(plan, results)))
            .collect()
    }

    /// Apply the plan's own scoring policy to its results.
    pub fn summarize(plan: Plan, results: Vec<SignalResult>) -> PlanSummary {
        // Both policies count triggered results; they differ in how the count reads.
        let score = results.iter().filter(|r| r.is_alert()).count();
        let unknown = results.iter().filter(|r| r.is_unknown()).count();
        let max_score = results.len();

        let verdict = match plan.scoring_policy() {
            ScoringPolicy::Readiness => Self::readiness_verdict(score, max_score),
            ScoringPolicy::AlertCount | ScoringPolicy::NotScored => {
                if score > 0 {
                    PlanVerdict::Active
                } else {
                    PlanVerdict::Clear
                }
            }
        };

        PlanSummary {
            plan,
            results,
            score,
            max_score,
            unknown,
            verdict,
        }
    }

    /// `== max` is a full re-entry, `>= 2` is phased, anything less holds.
    pub fn readiness_verdict(score: usize, max_score: usize) -> PlanVerdict {
        if max_score > 0 && score == max_score {
            PlanVerdict::FullReentry
        } else if score >= PHASED_REENTRY_MIN {
            PlanVerdict::PhasedReentry
        } else {
            PlanVerdict::Hold
        }
    }
}
