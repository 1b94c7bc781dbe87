//! Macro signal monitor: maps indicator snapshots onto strategic plans.

pub mod allocation;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod reports;
pub mod services;
pub mod signals;
pub mod strategies;
