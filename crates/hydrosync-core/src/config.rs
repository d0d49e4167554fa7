//! hydro.toml configuration parser.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::record::TagMatch;

/// Top-level configuration for a hydration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory holding discovery caches, registries, and error ledgers.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    pub gateway: GatewayConfig,
    pub scheduler: SchedulerConfig,
    /// Category key → discovery filter definition.
    pub categories: BTreeMap<String, CategoryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Indexing-service query endpoint.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Base URL of the scheduler-union endpoint.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub serving_nodes: Vec<String>,
    #[serde(default)]
    pub match_tags: Vec<TagMatch>,
    pub min_block_height: Option<u64>,
    pub filter_noise: Option<bool>,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}

impl SyncConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SyncConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config: SyncConfig = toml::from_str(
            r#"
            [gateway]
            url = "http://gateway.local/index"

            [scheduler]
            url = "http://scheduler.local"

            [categories.pages]
            serving_nodes = ["http://node-a.local"]
            "#,
        )
        .unwrap();

        assert_eq!(config.state_dir, PathBuf::from("state"));
        let pages = &config.categories["pages"];
        assert!(pages.match_tags.is_empty());
        assert_eq!(pages.min_block_height, None);
        assert_eq!(pages.filter_noise, None);
    }

    #[test]
    fn parse_full_category() {
        let config: SyncConfig = toml::from_str(
            r#"
            state_dir = "/var/lib/hydro"

            [gateway]
            url = "http://gateway.local/index"

            [scheduler]
            url = "http://scheduler.local"

            [categories.pages]
            serving_nodes = ["http://node-a.local", "http://node-b.local"]
            min_block_height = 42
            filter_noise = true

            [[categories.pages.match_tags]]
            name = "Type"
            values = ["Page"]

            [[categories.pages.match_tags]]
            name = "App"
            values = ["publisher"]
            "#,
        )
        .unwrap();

        assert_eq!(config.state_dir, PathBuf::from("/var/lib/hydro"));
        let pages = &config.categories["pages"];
        assert_eq!(pages.serving_nodes.len(), 2);
        assert_eq!(pages.match_tags.len(), 2);
        assert_eq!(pages.match_tags[0].name, "Type");
        assert_eq!(pages.min_block_height, Some(42));
        assert_eq!(pages.filter_noise, Some(true));
    }
}
