//! Evaluated outcome of one rule against one snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::indicators::Indicator;
use super::plan::Plan;

/// Three-valued status; `Unknown` whenever an input was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalStatus {
    Alert,
    Ok,
    Unknown,
}

impl SignalStatus {
    pub fn from_triggered(triggered: Option<bool>) -> Self {
        match triggered {
            Some(true) => SignalStatus::Alert,
            Some(false) => SignalStatus::Ok,
            None => SignalStatus::Unknown,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            SignalStatus::Alert => "🟥",
            SignalStatus::Ok => "✅",
            SignalStatus::Unknown => "❔",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStatus::Alert => "ALERT",
            SignalStatus::Ok => "OK",
            SignalStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub rule_id: String,
    pub label: String,
    /// Label with the live value(s) embedded, for display.
    pub detail: String,
    pub plan: Plan,
    pub action: String,
    pub triggered: Option<bool>,
    pub status: SignalStatus,
    /// Inputs the rule needed but the snapshot lacked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<Indicator>,
}

impl SignalResult {
    pub fn is_alert(&self) -> bool {
        self.status == SignalStatus::Alert
    }

    pub fn is_unknown(&self) -> bool {
        self.status == SignalStatus::Unknown
    }
}
