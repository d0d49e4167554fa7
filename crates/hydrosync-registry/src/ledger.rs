//! Error ledger — append-only failure records for post-mortem triage.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub process_id: String,
    /// ISO-8601 UTC timestamp of when the failure was recorded.
    pub timestamp: String,
    /// Error code, message, or stringified cause.
    pub signal: String,
}

/// Per-category append-only list of [`ErrorRecord`]s.
///
/// The coordinator only ever appends; nothing reads this back to change
/// control flow.
#[derive(Debug)]
pub struct ErrorLedger {
    path: PathBuf,
    records: Vec<ErrorRecord>,
}

impl ErrorLedger {
    /// Load the ledger for a category, or start empty if absent.
    pub fn load(state_dir: &Path, category: &str) -> RegistryResult<Self> {
        let path = state_dir.join(format!("{category}.errors.json"));
        let records = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| RegistryError::Malformed {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(RegistryError::Read {
                    path: path.clone(),
                    source,
                });
            }
        };
        Ok(Self { path, records })
    }

    /// Append a failure record and persist immediately.
    pub fn record(&mut self, process_id: &str, signal: &str) -> RegistryResult<()> {
        self.records.push(ErrorRecord {
            process_id: process_id.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            signal: signal.to_string(),
        });
        let content = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.path, content).map_err(|source| RegistryError::Persist {
            path: self.path.clone(),
            source,
        })?;
        debug!(process_id, signal, "error recorded to ledger");
        Ok(())
    }

    /// Recorded failures, oldest first.
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }
}
