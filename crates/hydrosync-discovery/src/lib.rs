//! hydrosync-discovery — candidate discovery against the indexing gateway.
//!
//! Queries the external indexing service with a category's filter, follows
//! opaque pagination cursors until the end sentinel, and aggregates every
//! page into a single ordered result set. Aggregated results are persisted
//! to a per-category disk cache; repeat runs read the cache and skip the
//! gateway entirely (delete the cache file to force a refresh).

pub mod cache;
pub mod client;
pub mod error;
pub mod wire;

pub use cache::DiscoveryCache;
pub use client::{GatewayClient, IndexingQuery, discover, discover_with_cache};
pub use error::DiscoveryError;
pub use wire::{IndexEntry, IndexPage, IndexQuery};
