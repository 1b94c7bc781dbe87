//! Long-running surfaces: the HTTP API and the report scheduler

pub mod http;
pub mod scheduler;

pub use http::*;
pub use scheduler::*;
