//! Configuration: environment lookups plus the optional TOML file that
//! overrides rule thresholds and allocation targets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::allocation::DEFAULT_TOLERANCE;
use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_FRED_BASE_URL: &str = "https://api.stlouisfed.org";
/// Mondays 13:00 UTC (sec min hour dom month dow year).
pub const DEFAULT_REPORT_CRON: &str = "0 0 13 * * Mon *";

pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn is_production() -> bool {
    matches!(get_environment().as_str(), "production" | "prod")
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn get_fred_api_key() -> Option<String> {
    env::var("FRED_API_KEY").ok().filter(|key| !key.trim().is_empty())
}

pub fn get_fred_base_url() -> String {
    env::var("FRED_BASE_URL").unwrap_or_else(|_| DEFAULT_FRED_BASE_URL.to_string())
}

pub fn get_report_cron() -> String {
    env::var("REPORT_CRON").unwrap_or_else(|_| DEFAULT_REPORT_CRON.to_string())
}

pub fn get_config_path() -> Option<String> {
    env::var("MACROWATCH_CONFIG").ok()
}

pub fn get_snapshot_overrides_path() -> Option<String> {
    env::var("SNAPSHOT_OVERRIDES").ok()
}

/// Threshold constants behind the rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub vix_elevated: f64,
    pub vix_severe: f64,
    pub vix_calm: f64,
    /// Drawdown below the 200-day MA, in percent.
    pub sp_correction_pct: f64,
    pub cpi_high: f64,
    pub cpi_stable: f64,
    pub hy_oas_bps: f64,
    pub gdp_floor: f64,
    pub lei_floor: f64,
    pub treasury_10y_ceiling: f64,
    /// Magnitude of the 3-month dollar decline, in percent.
    pub dxy_drop_pct: f64,
    pub cds_bps: f64,
    pub gscpi: f64,
    pub trade_deficit_usd_b: f64,
    pub eem_outperformance_pct: f64,
    pub commodity_rally_pct: f64,
    pub china_holdings_drop_usd_b: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            vix_elevated: 20.0,
            vix_severe: 25.0,
            vix_calm: 18.0,
            sp_correction_pct: 10.0,
            cpi_high: 4.0,
            cpi_stable: 3.5,
            hy_oas_bps: 500.0,
            gdp_floor: 0.0,
            lei_floor: 101.0,
            treasury_10y_ceiling: 5.0,
            dxy_drop_pct: 5.0,
            cds_bps: 50.0,
            gscpi: 1.5,
            trade_deficit_usd_b: 80.0,
            eem_outperformance_pct: 5.0,
            commodity_rally_pct: 5.0,
            china_holdings_drop_usd_b: 100.0,
        }
    }
}

impl Thresholds {
    fn values(&self) -> [(&'static str, f64); 17] {
        [
            ("vix_elevated", self.vix_elevated),
            ("vix_severe", self.vix_severe),
            ("vix_calm", self.vix_calm),
            ("sp_correction_pct", self.sp_correction_pct),
            ("cpi_high", self.cpi_high),
            ("cpi_stable", self.cpi_stable),
            ("hy_oas_bps", self.hy_oas_bps),
            ("gdp_floor", self.gdp_floor),
            ("lei_floor", self.lei_floor),
            ("treasury_10y_ceiling", self.treasury_10y_ceiling),
            ("dxy_drop_pct", self.dxy_drop_pct),
            ("cds_bps", self.cds_bps),
            ("gscpi", self.gscpi),
            ("trade_deficit_usd_b", self.trade_deficit_usd_b),
            ("eem_outperformance_pct", self.eem_outperformance_pct),
            ("commodity_rally_pct", self.commodity_rally_pct),
            ("china_holdings_drop_usd_b", self.china_holdings_drop_usd_b),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((name, _)) = self.values().iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "threshold {name} must be a finite number"
            )));
        }
        if !(0.0..100.0).contains(&self.sp_correction_pct) {
            return Err(ConfigError::Validation(
                "sp_correction_pct must be within [0, 100)".into(),
            ));
        }
        Ok(())
    }
}

/// Target allocation and tolerance band, in percentage points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub tolerance: f64,
    pub targets: BTreeMap<String, f64>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            targets: BTreeMap::from([
                ("Stocks".to_string(), 50.0),
                ("Bonds".to_string(), 30.0),
                ("Private".to_string(), 20.0),
            ]),
        }
    }
}

impl AllocationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::Validation(
                "allocation tolerance must be a non-negative number".into(),
            ));
        }
        if self.targets.is_empty() {
            return Err(ConfigError::Validation(
                "at least one allocation target must be defined".into(),
            ));
        }
        if let Some((name, _)) = self
            .targets
            .iter()
            .find(|(_, pct)| !pct.is_finite() || **pct < 0.0)
        {
            return Err(ConfigError::Validation(format!(
                "target for {name} must be a non-negative number"
            )));
        }
        let sum: f64 = self.targets.values().sum();
        if (sum - 100.0).abs() > 0.01 {
            return Err(ConfigError::Validation(format!(
                "allocation targets must sum to 100, got {sum}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub allocation: AllocationConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        self.allocation.validate()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load from `MACROWATCH_CONFIG` when set, defaults otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        match get_config_path() {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
