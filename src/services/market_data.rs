//! Snapshot sources behind a common async interface.

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::indicators::Snapshot;

#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Collect the current indicator values. Indicators the source cannot
    /// supply stay absent.
    async fn fetch_snapshot(&self) -> Result<Snapshot, ProviderError>;
}

/// Always returns the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshotProvider {
    snapshot: Snapshot,
}

impl StaticSnapshotProvider {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a JSON object such as `{"vix": 18.2, "cpi_yoy": null}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = serde_json::from_str(&contents).map_err(|e| ProviderError::Decode {
            series: path.display().to_string(),
            details: e.to_string(),
        })?;
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[async_trait]
impl SnapshotProvider for StaticSnapshotProvider {
    async fn fetch_snapshot(&self) -> Result<Snapshot, ProviderError> {
        Ok(self.snapshot.clone())
    }
}

/// Base provider with manually maintained values layered on top.
pub struct LayeredSnapshotProvider {
    base: Arc<dyn SnapshotProvider>,
    overrides: Snapshot,
}

impl LayeredSnapshotProvider {
    pub fn new(base: Arc<dyn SnapshotProvider>, overrides: Snapshot) -> Self {
        Self { base, overrides }
    }
}

#[async_trait]
impl SnapshotProvider for LayeredSnapshotProvider {
    async fn fetch_snapshot(&self) -> Result<Snapshot, ProviderError> {
        let fetched = self.base.fetch_snapshot().await?;
        debug!(
            fetched = fetched.len(),
            overrides = self.overrides.len(),
            "Merging snapshot overrides"
        );
        Ok(fetched.merge(&self.overrides))
    }
}
