//! hydrosync-registry — durable per-category run state.
//!
//! Two flat JSON documents per category, both human-readable and safe to
//! inspect or edit between runs:
//!
//! - the **hydration registry**: the set of process ids already hydrated,
//!   rewritten wholesale after every success so a crash loses at most the
//!   in-flight process;
//! - the **error ledger**: an append-only list of failure records for
//!   post-mortem triage, never consulted for control flow.
//!
//! Only a single non-concurrent invocation per category may write these
//! files; concurrent invocations for the same category are unsupported.

pub mod error;
pub mod ledger;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use ledger::{ErrorLedger, ErrorRecord};
pub use registry::HydrationRegistry;
