//! Stall detection for checkpoint polling.

/// Result of recording one successful checkpoint poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The checkpoint moved past the last observed value.
    Advanced(u64),
    /// Same value as last time, but below the stall threshold.
    Unchanged(u64),
    /// The threshold of consecutive unchanged polls was reached.
    Stalled,
}

/// Tracks consecutive unchanged checkpoints across successful polls.
///
/// Failed polls are not recorded here: they neither count toward the stall
/// threshold nor reset it. Only a checkpoint that actually advances resets
/// the counter.
#[derive(Debug)]
pub struct ConvergenceTracker {
    stall_threshold: u32,
    last: Option<u64>,
    unchanged: u32,
}

impl ConvergenceTracker {
    pub fn new(stall_threshold: u32) -> Self {
        Self {
            stall_threshold,
            last: None,
            unchanged: 0,
        }
    }

    /// Record a successfully polled checkpoint.
    pub fn record(&mut self, checkpoint: u64) -> PollOutcome {
        match self.last {
            Some(prev) if prev == checkpoint => {
                self.unchanged += 1;
                if self.unchanged >= self.stall_threshold {
                    PollOutcome::Stalled
                } else {
                    PollOutcome::Unchanged(checkpoint)
                }
            }
            _ => {
                self.last = Some(checkpoint);
                self.unchanged = 1;
                PollOutcome::Advanced(checkpoint)
            }
        }
    }

    /// Last successfully observed checkpoint.
    pub fn last_observed(&self) -> Option<u64> {
        self.last
    }
}
