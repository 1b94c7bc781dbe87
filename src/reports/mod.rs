//! Text rendering of signal and allocation reports.

pub mod email;
pub mod tables;

pub use email::{render_email, EmailReport};
pub use tables::{render_allocation_table, render_plan_badges, render_risk, render_signal_table};
