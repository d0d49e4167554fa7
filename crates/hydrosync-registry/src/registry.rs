//! Hydration registry — which processes a category has already hydrated.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};

/// On-disk shape of the registry document.
///
/// The hydrated set is a list for serialization; membership is set
/// semantics in memory.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryDoc {
    category: String,
    hydrated: BTreeSet<String>,
}

/// Per-category set of already-hydrated process ids.
///
/// Once an id is recorded it is never removed or re-processed. Every
/// mutation rewrites the full document immediately.
#[derive(Debug)]
pub struct HydrationRegistry {
    path: PathBuf,
    category: String,
    hydrated: BTreeSet<String>,
}

impl HydrationRegistry {
    /// Load the registry for a category, or start empty if no document
    /// exists yet. A document that exists but does not parse is fatal.
    pub fn load(state_dir: &Path, category: &str) -> RegistryResult<Self> {
        let path = state_dir.join(format!("{category}.registry.json"));
        let hydrated = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let doc: RegistryDoc = serde_json::from_str(&content).map_err(|source| {
                    RegistryError::Malformed {
                        path: path.clone(),
                        source,
                    }
                })?;
                doc.hydrated
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(source) => {
                return Err(RegistryError::Read {
                    path: path.clone(),
                    source,
                });
            }
        };

        debug!(category, count = hydrated.len(), "hydration registry loaded");
        Ok(Self {
            path,
            category: category.to_string(),
            hydrated,
        })
    }

    /// Whether a process id has already been hydrated.
    pub fn contains(&self, id: &str) -> bool {
        self.hydrated.contains(id)
    }

    /// Number of ids recorded as hydrated.
    pub fn len(&self) -> usize {
        self.hydrated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hydrated.is_empty()
    }

    /// Record a process as hydrated and persist the full document at once.
    pub fn mark_hydrated(&mut self, id: &str) -> RegistryResult<()> {
        self.hydrated.insert(id.to_string());
        self.persist()?;
        debug!(category = %self.category, id, "process marked hydrated");
        Ok(())
    }

    fn persist(&self) -> RegistryResult<()> {
        let doc = RegistryDoc {
            category: self.category.clone(),
            hydrated: self.hydrated.clone(),
        };
        let content = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&self.path, content).map_err(|source| RegistryError::Persist {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_document_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = HydrationRegistry::load(dir.path(), "pages").unwrap();
        assert!(registry.is_empty());
        assert!(!registry.contains("proc-1"));
    }

    #[test]
    fn mark_hydrated_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = HydrationRegistry::load(dir.path(), "pages").unwrap();
        registry.mark_hydrated("proc-1").unwrap();
        registry.mark_hydrated("proc-2").unwrap();

        let reloaded = HydrationRegistry::load(dir.path(), "pages").unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("proc-1"));
        assert!(reloaded.contains("proc-2"));
    }

    #[test]
    fn marking_twice_keeps_set_semantics() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = HydrationRegistry::load(dir.path(), "pages").unwrap();
        registry.mark_hydrated("proc-1").unwrap();
        registry.mark_hydrated("proc-1").unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn categories_use_separate_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut pages = HydrationRegistry::load(dir.path(), "pages").unwrap();
        pages.mark_hydrated("proc-1").unwrap();

        let domains = HydrationRegistry::load(dir.path(), "domains").unwrap();
        assert!(!domains.contains("proc-1"));
    }

    #[test]
    fn malformed_document_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pages.registry.json"), "not json").unwrap();

        let err = HydrationRegistry::load(dir.path(), "pages").unwrap_err();
        assert!(matches!(err, RegistryError::Malformed { .. }));
    }
}
