//! The per-process hydration state machine.

use tokio::time::sleep;
use tracing::{debug, info, warn};

use hydrosync_core::{CategoryFilter, ProcessRecord};
use hydrosync_registry::{ErrorLedger, HydrationRegistry, RegistryResult};

use crate::convergence::{ConvergenceTracker, PollOutcome};
use crate::nodes::NodeClient;
use crate::policy::{CHECKPOINTED_VARIANTS, HydrationPolicy};
use crate::scheduler::AssignmentSource;

/// Tally for one category run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub total: usize,
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl CategorySummary {
    fn new(category: &str, total: usize) -> Self {
        Self {
            category: category.to_string(),
            total,
            skipped: 0,
            succeeded: 0,
            failed: 0,
        }
    }
}

/// In-memory result of one process's hydration attempt.
///
/// Folded into the registry or the error ledger and then discarded.
#[derive(Debug)]
pub struct HydrationOutcome {
    pub process_id: String,
    pub target_checkpoint: Option<u64>,
    /// Node → whether that node's attempt succeeded, in attempt order.
    pub node_results: Vec<(String, bool)>,
    pub success: bool,
}

/// Drives hydration for every undiscovered-as-hydrated process of a
/// category, one process and one node at a time.
pub struct Coordinator<N, A> {
    nodes: N,
    assignments: A,
    policy: HydrationPolicy,
}

impl<N: NodeClient, A: AssignmentSource> Coordinator<N, A> {
    pub fn new(nodes: N, assignments: A, policy: HydrationPolicy) -> Self {
        Self {
            nodes,
            assignments,
            policy,
        }
    }

    /// Run the state machine over a category's discovered candidates.
    ///
    /// Node- and process-level failures are contained and tallied; only
    /// registry/ledger persistence failures propagate.
    pub async fn run_category(
        &self,
        category: &str,
        filter: &CategoryFilter,
        records: &[ProcessRecord],
        registry: &mut HydrationRegistry,
        ledger: &mut ErrorLedger,
    ) -> RegistryResult<CategorySummary> {
        let mut summary = CategorySummary::new(category, records.len());
        info!(category, candidates = records.len(), "category run started");

        for record in records {
            if record.id.is_empty() {
                debug!(category, "record without id skipped");
                summary.skipped += 1;
                continue;
            }
            if registry.contains(&record.id) {
                debug!(category, id = %record.id, "already hydrated, skipped");
                summary.skipped += 1;
                continue;
            }

            // Target resolution. Failure here is fatal for the process and
            // deliberately not retried within this run.
            let target = if requires_convergence(record) {
                match self.assignments.latest_nonce(&record.id).await {
                    Ok(nonce) => Some(nonce),
                    Err(e) => {
                        warn!(id = %record.id, error = %e, "target resolution failed");
                        ledger.record(&record.id, &format!("target resolution failed: {e}"))?;
                        summary.failed += 1;
                        continue;
                    }
                }
            } else {
                None
            };

            let outcome = self
                .hydrate_process(&record.id, target, &filter.serving_nodes)
                .await;

            if outcome.success {
                registry.mark_hydrated(&outcome.process_id)?;
                summary.succeeded += 1;
                info!(id = %outcome.process_id, ?target, "process hydrated");
            } else {
                let signal = format!("failed on all {} nodes", filter.serving_nodes.len());
                ledger.record(&outcome.process_id, &signal)?;
                summary.failed += 1;
                warn!(id = %outcome.process_id, "process failed on every node");
            }
        }

        info!(
            category,
            total = summary.total,
            skipped = summary.skipped,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "category run finished"
        );
        Ok(summary)
    }

    /// Attempt every serving node in configured order.
    ///
    /// All nodes are attempted even after a success so each redundant node
    /// ends up triggered; one success is enough for the process to count as
    /// hydrated.
    async fn hydrate_process(
        &self,
        process_id: &str,
        target: Option<u64>,
        serving_nodes: &[String],
    ) -> HydrationOutcome {
        let mut outcome = HydrationOutcome {
            process_id: process_id.to_string(),
            target_checkpoint: target,
            node_results: Vec::with_capacity(serving_nodes.len()),
            success: false,
        };

        for node in serving_nodes {
            let passed = self.attempt_node(node, process_id, target).await;
            outcome.node_results.push((node.clone(), passed));
            outcome.success |= passed;
        }

        outcome
    }

    async fn attempt_node(&self, node: &str, process_id: &str, target: Option<u64>) -> bool {
        if let Err(e) = self.nodes.trigger(node, process_id).await {
            warn!(node, process_id, error = %e, "execution trigger failed, node skipped");
            return false;
        }

        let Some(target) = target else {
            debug!(node, process_id, "no convergence required, node passes on trigger");
            return true;
        };

        self.converge(node, process_id, target).await
    }

    /// Poll one node until its checkpoint reaches the target or stalls.
    ///
    /// Poll errors back off and retry; they neither count toward nor reset
    /// stall detection. There is no wall-clock bound: abandonment happens
    /// only through the stall rule.
    async fn converge(&self, node: &str, process_id: &str, target: u64) -> bool {
        sleep(self.policy.settle_delay).await;

        let mut tracker = ConvergenceTracker::new(self.policy.stall_threshold);
        loop {
            match self.nodes.checkpoint(node, process_id).await {
                Err(e) => {
                    debug!(node, process_id, error = %e, "checkpoint poll failed, backing off");
                    sleep(self.policy.error_backoff).await;
                }
                Ok(checkpoint) => {
                    if checkpoint >= target {
                        info!(node, process_id, checkpoint, target, "node converged");
                        return true;
                    }
                    match tracker.record(checkpoint) {
                        PollOutcome::Stalled => {
                            warn!(node, process_id, checkpoint, target, "node stalled, abandoned");
                            return false;
                        }
                        PollOutcome::Advanced(_) | PollOutcome::Unchanged(_) => {
                            sleep(self.policy.poll_interval).await;
                        }
                    }
                }
            }
        }
    }
}

/// Whether a record's variant requires checkpoint convergence.
///
/// Missing or unknown variants are hydrated best-effort: triggering alone
/// passes a node.
fn requires_convergence(record: &ProcessRecord) -> bool {
    record
        .variant()
        .is_some_and(|v| CHECKPOINTED_VARIANTS.contains(&v))
}
