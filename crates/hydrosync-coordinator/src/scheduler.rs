//! Scheduler-union client — resolves a process's target checkpoint.
//!
//! The scheduler's latest committed assignment for a process carries a
//! monotonically increasing nonce in its tags; that nonce is the checkpoint
//! the serving nodes must reach.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use hydrosync_core::Tag;

use crate::http::{LegacyClient, build_client, request_text};

/// Tag on the assignment holding the target checkpoint.
const NONCE_TAG: &str = "Nonce";

/// Fixed path suffix for the latest-assignment query.
const LATEST_SUFFIX: &str = "latest";

/// A target-resolution failure. Fatal for the process, never retried
/// within a run.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("scheduler returned status {0}")]
    Status(u16),

    #[error("failed to decode assignment: {0}")]
    Decode(String),

    #[error("latest assignment for {0} carries no nonce tag")]
    MissingNonce(String),
}

/// Seam between the coordinator and the scheduler endpoint.
pub trait AssignmentSource {
    /// Nonce of the latest committed assignment for a process.
    fn latest_nonce(
        &self,
        process_id: &str,
    ) -> impl Future<Output = Result<u64, SchedulerError>>;
}

#[derive(Debug, Deserialize)]
struct LatestAssignment {
    assignment: Assignment,
}

#[derive(Debug, Deserialize)]
struct Assignment {
    #[serde(default)]
    tags: Vec<Tag>,
}

/// HTTP implementation against the real scheduler-union endpoint.
pub struct SchedulerClient {
    base_url: String,
    client: LegacyClient,
}

impl SchedulerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(),
        }
    }
}

impl AssignmentSource for SchedulerClient {
    async fn latest_nonce(&self, process_id: &str) -> Result<u64, SchedulerError> {
        let url = format!("{}/{process_id}/{LATEST_SUFFIX}", self.base_url);
        let (status, body) = request_text(&self.client, "GET", &url)
            .await
            .map_err(SchedulerError::Transport)?;
        if !status.is_success() {
            return Err(SchedulerError::Status(status.as_u16()));
        }

        let latest: LatestAssignment =
            serde_json::from_str(&body).map_err(|e| SchedulerError::Decode(e.to_string()))?;
        let nonce = first_tag(&latest.assignment.tags, NONCE_TAG)
            .ok_or_else(|| SchedulerError::MissingNonce(process_id.to_string()))?;
        let target = nonce
            .parse::<u64>()
            .map_err(|e| SchedulerError::Decode(format!("nonce '{nonce}': {e}")))?;
        debug!(process_id, target, "target checkpoint resolved");
        Ok(target)
    }
}

fn first_tag<'a>(tags: &'a [Tag], name: &str) -> Option<&'a str> {
    tags.iter().find(|t| t.name == name).map(|t| t.value.as_str())
}
