//! hydrosync-coordinator — drives each discovered process to a verified
//! execution checkpoint across its serving nodes.
//!
//! Per-process state machine:
//!
//! ```text
//! Discovered
//!   ├── Skipped                  (no id, or already in the registry)
//!   ├── TargetResolutionFailed   (scheduler query failed → ledger, Failed)
//!   └── TargetResolved
//!         └── NodesAttempted     (sequential trigger + convergence per node)
//!               ├── Hydrated     (≥ 1 node converged → registry)
//!               └── Failed       (all nodes failed → ledger)
//! ```
//!
//! Everything is strictly sequential: one category at a time, one process at
//! a time, one node at a time, one poll at a time. Node-level failures are
//! contained to the node, process-level failures to the process; only
//! durable-state persistence errors propagate out of a category run.

pub mod convergence;
pub mod coordinator;
pub mod nodes;
pub mod policy;
pub mod scheduler;

mod http;

pub use convergence::{ConvergenceTracker, PollOutcome};
pub use coordinator::{CategorySummary, Coordinator, HydrationOutcome};
pub use nodes::{HttpNodeClient, NodeClient, NodeError};
pub use policy::HydrationPolicy;
pub use scheduler::{AssignmentSource, SchedulerClient, SchedulerError};
