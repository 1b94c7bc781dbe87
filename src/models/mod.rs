//! Shared data models spanning the engine layers.

pub mod allocation;
pub mod indicators;
pub mod plan;
pub mod signal;
pub mod strategy;

pub use allocation::{AllocationInput, AllocationReport, AllocationRow, AllocationStatus};
pub use indicators::{Indicator, Snapshot};
pub use plan::{Plan, ScoringPolicy};
pub use signal::{SignalResult, SignalStatus};
pub use strategy::{Comparison, Condition, Operand, Rule};
