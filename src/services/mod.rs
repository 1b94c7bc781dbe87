pub mod fred;
pub mod market_data;
pub mod sink;

use std::sync::Arc;
use tracing::warn;

use crate::config::get_snapshot_overrides_path;
use crate::error::ProviderError;

pub use fred::{FredClient, FredSnapshotProvider};
pub use market_data::{LayeredSnapshotProvider, SnapshotProvider, StaticSnapshotProvider};
pub use sink::{LogReportSink, ReportSink, StdoutReportSink};

/// FRED when `FRED_API_KEY` is set, with the `SNAPSHOT_OVERRIDES` file layered
/// on top when present. `None` when neither is configured.
pub fn provider_from_env() -> Result<Option<Arc<dyn SnapshotProvider>>, ProviderError> {
    let overrides = get_snapshot_overrides_path()
        .map(StaticSnapshotProvider::from_json_file)
        .transpose()?;

    let provider: Option<Arc<dyn SnapshotProvider>> =
        match (FredSnapshotProvider::from_env()?, overrides) {
            (Some(fred), Some(overrides)) => Some(Arc::new(LayeredSnapshotProvider::new(
                Arc::new(fred),
                overrides.snapshot().clone(),
            ))),
            (Some(fred), None) => Some(Arc::new(fred)),
            (None, Some(overrides)) => {
                warn!("FRED_API_KEY not set, serving the overrides snapshot only");
                Some(Arc::new(overrides))
            }
            (None, None) => None,
        };
    Ok(provider)
}
