//! Signal evaluation interfaces.

pub mod aggregation;
pub mod engine;
pub mod scoring;

pub use aggregation::*;
pub use engine::*;
pub use scoring::*;
