//! Error types for discovery.
//!
//! Any failure here is fatal for the category being discovered: the
//! coordinator does not retry discovery within a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway returned status {0}")]
    Status(u16),

    #[error("gateway request timed out")]
    Timeout,

    #[error("failed to decode gateway response: {0}")]
    Decode(String),

    #[error("failed to build gateway request: {0}")]
    Request(String),

    #[error("discovery cache error: {0}")]
    Cache(String),
}
