//! Category catalog — maps category keys to discovery filters.
//!
//! Each category is defined once at startup from the configuration file and
//! never mutated afterwards.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::SyncConfig;
use crate::record::TagMatch;

/// Errors raised while resolving category keys.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown category '{key}' (known categories: {known})")]
    UnknownCategory { key: String, known: String },
}

/// Discovery filter for one category.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    /// Redundant serving nodes expected to host processes of this category,
    /// attempted in this order.
    pub serving_nodes: Vec<String>,
    /// Indexing-service filter predicate.
    pub match_tags: Vec<TagMatch>,
    /// Lower bound on block height for inclusion.
    pub min_block_height: Option<u64>,
    /// Drop records whose tag values match the noise predicate.
    pub filter_noise: bool,
}

/// Immutable mapping of category key → filter.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: BTreeMap<String, CategoryFilter>,
}

impl Catalog {
    /// Build the catalog from parsed configuration.
    pub fn from_config(config: &SyncConfig) -> Self {
        let categories = config
            .categories
            .iter()
            .map(|(key, cat)| {
                (
                    key.clone(),
                    CategoryFilter {
                        serving_nodes: cat.serving_nodes.clone(),
                        match_tags: cat.match_tags.clone(),
                        min_block_height: cat.min_block_height,
                        filter_noise: cat.filter_noise.unwrap_or(false),
                    },
                )
            })
            .collect();
        Self { categories }
    }

    /// Resolve a category key to its filter.
    ///
    /// Unknown keys fail with a listing of all valid keys so the operator
    /// can correct the invocation.
    pub fn resolve(&self, key: &str) -> Result<&CategoryFilter, CatalogError> {
        self.categories
            .get(key)
            .ok_or_else(|| CatalogError::UnknownCategory {
                key: key.to_string(),
                known: self.known_keys().join(", "),
            })
    }

    /// All configured category keys, sorted.
    pub fn known_keys(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }
}
