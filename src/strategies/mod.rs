//! Rule table and the evaluator that applies it to snapshots.

pub mod evaluator;
pub mod rules;

pub use evaluator::{evaluate, SignalEvaluator};
pub use rules::RuleSet;
