//! hydrosync-core — shared types for the hydration synchronizer.
//!
//! Defines the tag model and process records produced by discovery, the
//! category catalog that maps category keys to discovery filters, and the
//! TOML configuration the `hydro` binary reads at startup.

pub mod catalog;
pub mod config;
pub mod record;

pub use catalog::{Catalog, CatalogError, CategoryFilter};
pub use config::SyncConfig;
pub use record::{ProcessRecord, Tag, TagMatch};
