//! Main signal evaluation engine: rules, plan summaries and risk score in one pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{AllocationConfig, Config};
use crate::models::indicators::Snapshot;
use crate::models::plan::{Plan, ScoringPolicy};
use crate::models::signal::SignalResult;
use crate::signals::aggregation::{PlanAggregator, PlanSummary};
use crate::signals::scoring::{risk_score, RiskAssessment};
use crate::strategies::evaluator::SignalEvaluator;
use crate::strategies::rules::RuleSet;

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub results: Vec<SignalResult>,
    pub plans: BTreeMap<Plan, PlanSummary>,
    pub risk: RiskAssessment,
}

impl SignalReport {
    pub fn alerts(&self) -> impl Iterator<Item = &SignalResult> {
        self.results.iter().filter(|r| r.is_alert())
    }

    pub fn unknown(&self) -> impl Iterator<Item = &SignalResult> {
        self.results.iter().filter(|r| r.is_unknown())
    }
}

/// Per-plan view; each plan renders its own slice of the evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PlanView {
    Signals(PlanSummary),
    Allocation {
        plan: Plan,
        targets: BTreeMap<String, f64>,
        tolerance: f64,
    },
}

/// Immutable engine; share it read-only across tasks.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    rules: RuleSet,
    allocation: AllocationConfig,
}

impl SignalEngine {
    pub fn new(rules: RuleSet, allocation: AllocationConfig) -> Self {
        Self { rules, allocation }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            RuleSet::standard(&config.thresholds),
            config.allocation.clone(),
        )
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn allocation(&self) -> &AllocationConfig {
        &self.allocation
    }

    pub fn evaluate(&self, snapshot: &Snapshot) -> SignalReport {
        let results = SignalEvaluator::evaluate(&self.rules, snapshot);
        let plans = PlanAggregator::aggregate(&results);
        let risk = risk_score(&results);
        SignalReport {
            results,
            plans,
            risk,
        }
    }

    pub fn plan_view(&self, plan: Plan, snapshot: &Snapshot) -> PlanView {
        match plan.scoring_policy() {
            ScoringPolicy::NotScored => PlanView::Allocation {
                plan,
                targets: self.allocation.targets.clone(),
                tolerance: self.allocation.tolerance,
            },
            ScoringPolicy::AlertCount | ScoringPolicy::Readiness => {
                let results = self
                    .rules
                    .for_plan(plan)
                    .map(|rule| SignalEvaluator::evaluate_rule(rule, snapshot))
                    .collect();
                PlanView::Signals(PlanAggregator::summarize(plan, results))
            }
        }
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
