//! Declarative signal rule data models

use serde::{Deserialize, Serialize};

use super::indicators::Indicator;
use super::plan::Plan;

/// One threshold predicate bound to a plan and a suggested action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub label: String,
    pub condition: Condition,
    pub plan: Plan,
    pub action: String,
}

/// Indicator comparison condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub indicator: Indicator,
    pub comparison: Comparison,
    pub operand: Operand,
}

/// Comparison operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Comparison {
    GreaterThan,
    LessThan,
}

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Fixed threshold
    Constant(f64),
    /// Another indicator scaled by `factor` (e.g. 0.9 × 200-day MA)
    Indicator { indicator: Indicator, factor: f64 },
}

impl Condition {
    pub fn new(indicator: Indicator, comparison: Comparison, operand: Operand) -> Self {
        Self {
            indicator,
            comparison,
            operand,
        }
    }

    pub fn above(indicator: Indicator, threshold: f64) -> Self {
        Self::new(indicator, Comparison::GreaterThan, Operand::Constant(threshold))
    }

    pub fn below(indicator: Indicator, threshold: f64) -> Self {
        Self::new(indicator, Comparison::LessThan, Operand::Constant(threshold))
    }

    pub fn relative(
        indicator: Indicator,
        comparison: Comparison,
        other: Indicator,
        factor: f64,
    ) -> Self {
        Self::new(
            indicator,
            comparison,
            Operand::Indicator {
                indicator: other,
                factor,
            },
        )
    }

    /// Every snapshot field the condition reads, left side first.
    pub fn referenced(&self) -> Vec<Indicator> {
        match self.operand {
            Operand::Constant(_) => vec![self.indicator],
            Operand::Indicator { indicator, .. } => vec![self.indicator, indicator],
        }
    }
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
        }
    }
}
