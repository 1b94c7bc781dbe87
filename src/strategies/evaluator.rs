//! Rule evaluation against an indicator snapshot

use crate::models::indicators::{Indicator, Snapshot};
use crate::models::signal::{SignalResult, SignalStatus};
use crate::models::strategy::{Comparison, Condition, Operand, Rule};
use crate::strategies::rules::RuleSet;

pub struct SignalEvaluator;

impl SignalEvaluator {
    /// One result per rule, in rule set declaration order.
    pub fn evaluate(rules: &RuleSet, snapshot: &Snapshot) -> Vec<SignalResult> {
        rules
            .rules()
            .iter()
            .map(|rule| Self::evaluate_rule(rule, snapshot))
            .collect()
    }

    /// Evaluate a single rule. A missing input yields `Unknown`, never `Ok`.
    pub fn evaluate_rule(rule: &Rule, snapshot: &Snapshot) -> SignalResult {
        let (triggered, missing) = match Self::evaluate_condition(&rule.condition, snapshot) {
            Ok(triggered) => (Some(triggered), Vec::new()),
            Err(missing) => (None, missing),
        };

        SignalResult {
            rule_id: rule.id.clone(),
            label: rule.label.clone(),
            detail: Self::describe(rule, snapshot),
            plan: rule.plan,
            action: rule.action.clone(),
            triggered,
            status: SignalStatus::from_triggered(triggered),
            missing,
        }
    }

    /// Evaluate a condition, or return the indicators it lacked
    fn evaluate_condition(
        condition: &Condition,
        snapshot: &Snapshot,
    ) -> Result<bool, Vec<Indicator>> {
        let missing: Vec<Indicator> = condition
            .referenced()
            .into_iter()
            .filter(|indicator| !snapshot.contains(*indicator))
            .collect();

        let (Some(value), Some(threshold)) = (
            snapshot.get(condition.indicator),
            Self::resolve_operand(&condition.operand, snapshot),
        ) else {
            return Err(missing);
        };

        Ok(Self::compare_value(value, condition.comparison, threshold))
    }

    fn resolve_operand(operand: &Operand, snapshot: &Snapshot) -> Option<f64> {
        match *operand {
            Operand::Constant(threshold) => Some(threshold),
            Operand::Indicator { indicator, factor } => {
                snapshot.get(indicator).map(|value| value * factor)
            }
        }
    }

    /// Compare a value using the specified comparison operator
    fn compare_value(value: f64, comparison: Comparison, threshold: f64) -> bool {
        match comparison {
            Comparison::GreaterThan => value > threshold,
            Comparison::LessThan => value < threshold,
        }
    }

    /// Label with live values, e.g. `CPI>4% (4.60)` or `SP<MA200 (4100.00 vs 4300.00)`.
    fn describe(rule: &Rule, snapshot: &Snapshot) -> String {
        let values: Vec<String> = rule
            .condition
            .referenced()
            .into_iter()
            .map(|indicator| match snapshot.get(indicator) {
                Some(value) => format!("{:.2}", value),
                None => "n/a".to_string(),
            })
            .collect();
        format!("{} ({})", rule.label, values.join(" vs "))
    }
}

/// Evaluate the default rule table.
pub fn evaluate(snapshot: &Snapshot) -> Vec<SignalResult> {
    SignalEvaluator::evaluate(&RuleSet::default(), snapshot)
}
