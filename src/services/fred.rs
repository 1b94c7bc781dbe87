//! FRED (Federal Reserve Economic Data) snapshot provider
//!
//! Each series is fetched once, newest observation first, and reduced to an
//! indicator value. A series that fails after retries leaves its indicators
//! unknown; it never turns them into zeros.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{get_fred_api_key, get_fred_base_url};
use crate::error::ProviderError;
use crate::models::indicators::{Indicator, Snapshot};
use crate::services::market_data::SnapshotProvider;

/// FRED's marker for a missing observation.
const MISSING_VALUE: &str = ".";

/// How a series' observations (newest first) become one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesTransform {
    Latest,
    Scaled(f64),
    /// Mean of the newest `n` observations.
    Mean(usize),
    /// Percent change of the newest observation against the one `lag` steps back.
    PercentChange { lag: usize },
}

impl SeriesTransform {
    fn observations_needed(&self) -> usize {
        match self {
            SeriesTransform::Latest | SeriesTransform::Scaled(_) => 1,
            SeriesTransform::Mean(n) => *n,
            SeriesTransform::PercentChange { lag } => lag + 1,
        }
    }

    /// `None` when there are too few observations.
    pub fn apply(&self, observations: &[f64]) -> Option<f64> {
        if observations.len() < self.observations_needed() {
            return None;
        }
        match self {
            SeriesTransform::Latest => observations.first().copied(),
            SeriesTransform::Scaled(factor) => observations.first().map(|v| v * factor),
            SeriesTransform::Mean(n) => {
                Some(observations[..*n].iter().sum::<f64>() / *n as f64)
            }
            SeriesTransform::PercentChange { lag } => {
                let base = observations[*lag];
                if base == 0.0 {
                    return None;
                }
                Some((observations[0] / base - 1.0) * 100.0)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesMapping {
    pub series_id: &'static str,
    pub indicator: Indicator,
    pub transform: SeriesTransform,
}

const fn mapping(
    series_id: &'static str,
    indicator: Indicator,
    transform: SeriesTransform,
) -> SeriesMapping {
    SeriesMapping {
        series_id,
        indicator,
        transform,
    }
}

pub const FRED_SERIES: [SeriesMapping; 10] = [
    mapping("VIXCLS", Indicator::Vix, SeriesTransform::Latest),
    mapping("SP500", Indicator::SpPrice, SeriesTransform::Latest),
    mapping("SP500", Indicator::SpMa200, SeriesTransform::Mean(200)),
    mapping("DGS10", Indicator::Treasury10y, SeriesTransform::Latest),
    mapping("DGS3MO", Indicator::Treasury3m, SeriesTransform::Latest),
    mapping(
        "CPIAUCSL",
        Indicator::CpiYoy,
        SeriesTransform::PercentChange { lag: 12 },
    ),
    // Percent to basis points.
    mapping("BAMLH0A0HYM2", Indicator::HyOasBps, SeriesTransform::Scaled(100.0)),
    mapping("A191RL1Q225SBEA", Indicator::GdpGrowth, SeriesTransform::Latest),
    mapping("USSLIND", Indicator::Lei, SeriesTransform::Latest),
    mapping(
        "DTWEXBGS",
        Indicator::Dxy3moChangePct,
        SeriesTransform::PercentChange { lag: 63 },
    ),
];

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    value: String,
}

/// Thin client for `fred/series/observations`.
#[derive(Debug, Clone)]
pub struct FredClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    backoff: ExponentialBuilder,
}

impl FredClient {
    /// Client with a 10s request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(ProviderError::Client)?;
        Ok(Self::with_client(base_url, api_key, http))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
            backoff: ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(250))
                .with_max_delay(Duration::from_secs(5))
                .with_max_times(3),
        }
    }

    pub fn with_backoff(mut self, backoff: ExponentialBuilder) -> Self {
        self.backoff = backoff;
        self
    }

    /// Newest-first numeric observations, skipping FRED's `.` placeholders.
    pub async fn observations(
        &self,
        series_id: &str,
        limit: usize,
    ) -> Result<Vec<f64>, ProviderError> {
        (|| self.fetch_observations(series_id, limit))
            .retry(self.backoff)
            .when(ProviderError::is_retryable)
            .notify(|err: &ProviderError, delay: Duration| {
                warn!(series = series_id, error = %err, ?delay, "Retrying FRED request");
            })
            .await
    }

    async fn fetch_observations(
        &self,
        series_id: &str,
        limit: usize,
    ) -> Result<Vec<f64>, ProviderError> {
        let url = format!("{}/fred/series/observations", self.base_url);
        let limit_param = limit.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                series: series_id.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                series: series_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body: ObservationsResponse =
            response.json().await.map_err(|e| ProviderError::Decode {
                series: series_id.to_string(),
                details: e.to_string(),
            })?;

        let mut values = Vec::with_capacity(body.observations.len());
        for observation in body.observations {
            let raw = observation.value.trim();
            if raw == MISSING_VALUE {
                continue;
            }
            let value = raw.parse::<f64>().map_err(|_| ProviderError::Decode {
                series: series_id.to_string(),
                details: format!("non-numeric observation {raw:?}"),
            })?;
            values.push(value);
        }

        debug!(series = series_id, count = values.len(), "Fetched FRED observations");
        Ok(values)
    }
}

pub struct FredSnapshotProvider {
    client: FredClient,
}

impl FredSnapshotProvider {
    pub fn new(client: FredClient) -> Self {
        Self { client }
    }

    /// `None` when `FRED_API_KEY` is not set.
    pub fn from_env() -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = get_fred_api_key() else {
            return Ok(None);
        };
        let client = FredClient::new(get_fred_base_url(), api_key)?;
        Ok(Some(Self::new(client)))
    }

    /// Observations to request per series, with headroom for `.` placeholders.
    fn series_limits() -> BTreeMap<&'static str, usize> {
        let mut limits = BTreeMap::new();
        for mapping in FRED_SERIES.iter() {
            let needed = mapping.transform.observations_needed();
            let entry = limits.entry(mapping.series_id).or_insert(0);
            *entry = (*entry).max(needed + needed / 10 + 5);
        }
        limits
    }
}

#[async_trait]
impl SnapshotProvider for FredSnapshotProvider {
    async fn fetch_snapshot(&self) -> Result<Snapshot, ProviderError> {
        let mut snapshot = Snapshot::new();

        for (series_id, limit) in Self::series_limits() {
            let observations = match self.client.observations(series_id, limit).await {
                Ok(observations) => observations,
                Err(e) => {
                    warn!(series = series_id, error = %e, "FRED series unavailable, leaving indicators unknown");
                    continue;
                }
            };

            for mapping in FRED_SERIES.iter().filter(|m| m.series_id == series_id) {
                match mapping.transform.apply(&observations) {
                    Some(value) => snapshot.set(mapping.indicator, value)?,
                    None => warn!(
                        series = series_id,
                        indicator = %mapping.indicator,
                        available = observations.len(),
                        "Not enough FRED observations"
                    ),
                }
            }
        }

        info!(
            known = snapshot.len(),
            unknown = snapshot.unknown().len(),
            "FRED snapshot collected"
        );
        Ok(snapshot)
    }
}
