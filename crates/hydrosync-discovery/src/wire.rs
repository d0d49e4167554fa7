//! Wire types for the indexing-service query interface.

use hydrosync_core::{ProcessRecord, Tag, TagMatch};
use serde::{Deserialize, Serialize};

/// One query against the indexing service.
///
/// Re-issued unchanged with each returned cursor until the service signals
/// no further pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuery {
    pub tags: Vec<TagMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_block_height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexPage {
    pub count: u64,
    pub data: Vec<IndexEntry>,
    /// Opaque cursor for the next page; absent, empty, or `"null"` marks the
    /// end of results.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl IndexPage {
    /// Cursor to feed into the next query, unless this page is the last.
    pub fn continuation(&self) -> Option<&str> {
        match self.next_cursor.as_deref() {
            Some(c) if !c.is_empty() && c != "null" => Some(c),
            _ => None,
        }
    }
}

/// One result entry, carrying its own pagination cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl From<IndexEntry> for ProcessRecord {
    fn from(entry: IndexEntry) -> Self {
        ProcessRecord {
            id: entry.id,
            tags: entry.tags,
        }
    }
}
