//! Allocation-vs-target comparison, independent of the signal pipeline.

pub mod comparator;
pub mod parser;

pub use comparator::{AllocationComparator, DEFAULT_TOLERANCE};
pub use parser::parse_allocation_csv;
