//! Indicator names and the point-in-time snapshot of their values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SnapshotError;

/// Tracked macro and market indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Vix,
    SpPrice,
    SpMa200,
    Treasury10y,
    Treasury3m,
    CpiYoy,
    HyOasBps,
    GdpGrowth,
    Lei,
    Dxy3moChangePct,
    CdsSpreadBps,
    Gscpi,
    TradeDeficitUsdB,
    EemVsSpy3moPct,
    Commodity3moChangePct,
    ChinaHoldingsDropUsdB,
}

impl Indicator {
    pub const ALL: [Indicator; 16] = [
        Indicator::Vix,
        Indicator::SpPrice,
        Indicator::SpMa200,
        Indicator::Treasury10y,
        Indicator::Treasury3m,
        Indicator::CpiYoy,
        Indicator::HyOasBps,
        Indicator::GdpGrowth,
        Indicator::Lei,
        Indicator::Dxy3moChangePct,
        Indicator::CdsSpreadBps,
        Indicator::Gscpi,
        Indicator::TradeDeficitUsdB,
        Indicator::EemVsSpy3moPct,
        Indicator::Commodity3moChangePct,
        Indicator::ChinaHoldingsDropUsdB,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Vix => "vix",
            Indicator::SpPrice => "sp_price",
            Indicator::SpMa200 => "sp_ma200",
            Indicator::Treasury10y => "treasury_10y",
            Indicator::Treasury3m => "treasury_3m",
            Indicator::CpiYoy => "cpi_yoy",
            Indicator::HyOasBps => "hy_oas_bps",
            Indicator::GdpGrowth => "gdp_growth",
            Indicator::Lei => "lei",
            Indicator::Dxy3moChangePct => "dxy_3mo_change_pct",
            Indicator::CdsSpreadBps => "cds_spread_bps",
            Indicator::Gscpi => "gscpi",
            Indicator::TradeDeficitUsdB => "trade_deficit_usd_b",
            Indicator::EemVsSpy3moPct => "eem_vs_spy_3mo_pct",
            Indicator::Commodity3moChangePct => "commodity_3mo_change_pct",
            Indicator::ChinaHoldingsDropUsdB => "china_holdings_drop_usd_b",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indicator {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Indicator::ALL
            .iter()
            .copied()
            .find(|indicator| indicator.as_str() == name)
            .ok_or_else(|| SnapshotError::UnknownIndicator(name.to_string()))
    }
}

/// Current value of each indicator. Absent means unknown, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Value>",
    into = "BTreeMap<String, Option<f64>>"
)]
pub struct Snapshot {
    values: BTreeMap<Indicator, f64>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, indicator: Indicator, value: f64) -> Result<Self, SnapshotError> {
        self.set(indicator, value)?;
        Ok(self)
    }

    pub fn set(&mut self, indicator: Indicator, value: f64) -> Result<(), SnapshotError> {
        if !value.is_finite() {
            return Err(SnapshotError::InvalidNumericInput {
                indicator,
                value: value.to_string(),
            });
        }
        self.values.insert(indicator, value);
        Ok(())
    }

    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        self.values.get(&indicator).copied()
    }

    pub fn contains(&self, indicator: Indicator) -> bool {
        self.values.contains_key(&indicator)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        self.values.iter().map(|(indicator, value)| (*indicator, *value))
    }

    /// Indicators this snapshot has no value for.
    pub fn unknown(&self) -> Vec<Indicator> {
        Indicator::ALL
            .iter()
            .copied()
            .filter(|indicator| !self.contains(*indicator))
            .collect()
    }

    /// Layer `other` on top of `self`; values present in `other` win.
    pub fn merge(&self, other: &Snapshot) -> Snapshot {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (*k, *v)));
        Snapshot { values }
    }

    /// Build from textual `name = value` pairs. Empty, `na`, `n/a`,
    /// `unknown` and `null` mean the indicator is unknown.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut snapshot = Snapshot::new();
        for (name, raw) in fields {
            let indicator: Indicator = name.parse()?;
            let raw = raw.trim();
            if is_unknown_marker(raw) {
                continue;
            }
            let value = raw
                .parse::<f64>()
                .map_err(|_| SnapshotError::InvalidNumericInput {
                    indicator,
                    value: raw.to_string(),
                })?;
            snapshot.set(indicator, value)?;
        }
        Ok(snapshot)
    }
}

fn is_unknown_marker(raw: &str) -> bool {
    raw.is_empty()
        || ["na", "n/a", "unknown", "null"]
            .iter()
            .any(|marker| raw.eq_ignore_ascii_case(marker))
}

impl TryFrom<BTreeMap<String, Value>> for Snapshot {
    type Error = SnapshotError;

    fn try_from(raw: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        let mut snapshot = Snapshot::new();
        for (name, value) in raw {
            let indicator: Indicator = name.parse()?;
            match value {
                Value::Null => {}
                Value::Number(ref number) => {
                    let parsed = number.as_f64().ok_or_else(|| {
                        SnapshotError::InvalidNumericInput {
                            indicator,
                            value: number.to_string(),
                        }
                    })?;
                    snapshot.set(indicator, parsed)?;
                }
                other => {
                    return Err(SnapshotError::InvalidNumericInput {
                        indicator,
                        value: other.to_string(),
                    })
                }
            }
        }
        Ok(snapshot)
    }
}

impl From<Snapshot> for BTreeMap<String, Option<f64>> {
    fn from(snapshot: Snapshot) -> Self {
        Indicator::ALL
            .iter()
            .map(|indicator| (indicator.as_str().to_string(), snapshot.get(*indicator)))
            .collect()
    }
}
