//! Serving-node client — execution triggers and checkpoint queries.

use thiserror::Error;
use tracing::debug;

use crate::http::{LegacyClient, build_client, request_text};

/// A failure confined to one node attempt.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("node returned status {0}")]
    Status(u16),

    #[error("invalid checkpoint payload: {0}")]
    Decode(String),
}

/// Seam between the coordinator and serving nodes; tests provide fakes.
pub trait NodeClient {
    /// One-shot execution trigger for a process on a node. Success is any
    /// 2xx acknowledgement.
    fn trigger(
        &self,
        node: &str,
        process_id: &str,
    ) -> impl Future<Output = Result<(), NodeError>>;

    /// Current checkpoint of a process on a node, as a plain integer.
    fn checkpoint(
        &self,
        node: &str,
        process_id: &str,
    ) -> impl Future<Output = Result<u64, NodeError>>;
}

/// HTTP implementation against real serving nodes.
pub struct HttpNodeClient {
    client: LegacyClient,
}

impl HttpNodeClient {
    pub fn new() -> Self {
        Self {
            client: build_client(),
        }
    }
}

impl Default for HttpNodeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeClient for HttpNodeClient {
    async fn trigger(&self, node: &str, process_id: &str) -> Result<(), NodeError> {
        let url = format!("{node}/processes/{process_id}/hydrate");
        let (status, body) = request_text(&self.client, "POST", &url)
            .await
            .map_err(NodeError::Transport)?;
        if !status.is_success() {
            return Err(NodeError::Status(status.as_u16()));
        }
        debug!(%url, ack = %body.trim(), "execution trigger acknowledged");
        Ok(())
    }

    async fn checkpoint(&self, node: &str, process_id: &str) -> Result<u64, NodeError> {
        let url = format!("{node}/processes/{process_id}/checkpoint");
        let (status, body) = request_text(&self.client, "GET", &url)
            .await
            .map_err(NodeError::Transport)?;
        if !status.is_success() {
            return Err(NodeError::Status(status.as_u16()));
        }
        let text = body.trim();
        text.parse::<u64>()
            .map_err(|e| NodeError::Decode(format!("'{text}': {e}")))
    }
}
