//! Per-category disk cache of aggregated discovery results.
//!
//! Written once after full aggregation, read on every later run. Never
//! invalidated automatically; the operator deletes the file to force a
//! fresh query.

use std::path::{Path, PathBuf};

use tracing::debug;

use hydrosync_core::ProcessRecord;

use crate::error::DiscoveryError;

#[derive(Debug, Clone)]
pub struct DiscoveryCache {
    dir: PathBuf,
}

impl DiscoveryCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, category: &str) -> PathBuf {
        self.dir.join(format!("{category}.discovery.json"))
    }

    /// Cached result set for a category, if one has been written.
    ///
    /// A file that exists but does not parse is an error rather than a
    /// silent refetch; the operator decides whether to delete it.
    pub fn load(&self, category: &str) -> Result<Option<Vec<ProcessRecord>>, DiscoveryError> {
        let path = self.path_for(category);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DiscoveryError::Cache(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        let records = serde_json::from_str(&content).map_err(|e| {
            DiscoveryError::Cache(format!("malformed cache at {}: {e}", path.display()))
        })?;
        Ok(Some(records))
    }

    /// Persist a category's fully aggregated result set.
    pub fn store(&self, category: &str, records: &[ProcessRecord]) -> Result<(), DiscoveryError> {
        let path = self.path_for(category);
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| DiscoveryError::Cache(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| {
            DiscoveryError::Cache(format!("failed to write {}: {e}", path.display()))
        })?;
        debug!(category, count = records.len(), "discovery results cached");
        Ok(())
    }
}
