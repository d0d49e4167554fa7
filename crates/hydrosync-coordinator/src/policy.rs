//! Fixed hydration policy.
//!
//! The stall threshold and delays are systemic tolerances, not per-category
//! configuration, so they live here as constants rather than in hydro.toml.

use std::time::Duration;

/// Consecutive unchanged successful polls before a node counts as stalled.
pub const STALL_THRESHOLD: u32 = 3;

/// Variants whose execution must converge on a scheduler-assigned
/// checkpoint. Records with a missing or unknown variant are hydrated
/// best-effort: a successful trigger alone passes the node.
pub const CHECKPOINTED_VARIANTS: &[&str] = &["compute.v1"];

/// Timing knobs for the per-node convergence loop.
#[derive(Debug, Clone)]
pub struct HydrationPolicy {
    /// Wait after a trigger before the first checkpoint poll.
    pub settle_delay: Duration,
    /// Wait between successful checkpoint polls.
    pub poll_interval: Duration,
    /// Longer wait after a failed checkpoint poll.
    pub error_backoff: Duration,
    /// Consecutive unchanged polls before abandoning a node.
    pub stall_threshold: u32,
}

impl Default for HydrationPolicy {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(5),
            poll_interval: Duration::from_secs(10),
            error_backoff: Duration::from_secs(30),
            stall_threshold: STALL_THRESHOLD,
        }
    }
}

impl HydrationPolicy {
    /// Zero-delay policy (for testing).
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            poll_interval: Duration::ZERO,
            error_backoff: Duration::ZERO,
            stall_threshold: STALL_THRESHOLD,
        }
    }
}
