//! Error types for durable run state.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for registry and ledger operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while loading or persisting run state.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A document that exists but does not parse. Deliberately fatal:
    /// silently resetting it would re-trigger remote execution for every
    /// previously hydrated process.
    #[error("malformed document at {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
