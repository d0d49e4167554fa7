//! Gateway client and the pagination-driven discovery loop.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tracing::{debug, info};

use hydrosync_core::{CategoryFilter, ProcessRecord};

use crate::cache::DiscoveryCache;
use crate::error::DiscoveryError;
use crate::wire::{IndexPage, IndexQuery};

/// Per-request timeout for gateway queries.
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of indexing-service result pages.
///
/// The seam between the pagination loop and the network; tests provide a
/// scripted implementation.
pub trait IndexingQuery {
    fn query_page(
        &self,
        query: &IndexQuery,
    ) -> impl Future<Output = Result<IndexPage, DiscoveryError>>;
}

/// HTTP client for the indexing gateway.
pub struct GatewayClient {
    endpoint: String,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl GatewayClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl IndexingQuery for GatewayClient {
    async fn query_page(&self, query: &IndexQuery) -> Result<IndexPage, DiscoveryError> {
        let body = serde_json::to_vec(query).map_err(|e| DiscoveryError::Request(e.to_string()))?;
        let req = http::Request::builder()
            .method("POST")
            .uri(&self.endpoint)
            .header("content-type", "application/json")
            .header("user-agent", "hydrosync/0.1")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| DiscoveryError::Request(e.to_string()))?;

        let resp = tokio::time::timeout(QUERY_TIMEOUT, self.client.request(req))
            .await
            .map_err(|_| DiscoveryError::Timeout)?
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DiscoveryError::Status(resp.status().as_u16()));
        }

        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?
            .to_bytes();
        serde_json::from_slice(&bytes).map_err(|e| DiscoveryError::Decode(e.to_string()))
    }
}

/// Discover every candidate matching a category filter.
///
/// Follows pagination cursors until the end sentinel and aggregates pages
/// in arrival order. When the filter opts in, a separate pass drops noise
/// records after full aggregation. Any page failure aborts discovery for
/// the category.
pub async fn discover<Q: IndexingQuery>(
    index: &Q,
    filter: &CategoryFilter,
) -> Result<Vec<ProcessRecord>, DiscoveryError> {
    let mut records: Vec<ProcessRecord> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let query = IndexQuery {
            tags: filter.match_tags.clone(),
            min_block_height: filter.min_block_height,
            cursor: cursor.clone(),
        };
        let page = index.query_page(&query).await?;
        pages += 1;
        debug!(page = pages, entries = page.data.len(), "discovery page received");

        let continuation = page.continuation().map(str::to_string);
        records.extend(page.data.into_iter().map(ProcessRecord::from));

        match continuation {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    if filter.filter_noise {
        let before = records.len();
        records.retain(|r| !r.has_noise_tags());
        debug!(dropped = before - records.len(), "noise records filtered");
    }

    info!(pages, candidates = records.len(), "discovery complete");
    Ok(records)
}

/// Discover with the per-category disk cache in front of the gateway.
///
/// A cached result set short-circuits the gateway entirely; otherwise the
/// fully aggregated result is persisted before being returned.
pub async fn discover_with_cache<Q: IndexingQuery>(
    index: &Q,
    cache: &DiscoveryCache,
    category: &str,
    filter: &CategoryFilter,
) -> Result<Vec<ProcessRecord>, DiscoveryError> {
    if let Some(records) = cache.load(category)? {
        info!(category, candidates = records.len(), "using cached discovery results");
        return Ok(records);
    }

    let records = discover(index, filter).await?;
    cache.store(category, &records)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use hydrosync_core::{Tag, TagMatch};

    use super::*;
    use crate::wire::IndexEntry;

    /// Scripted page source; counts issued queries.
    struct ScriptedIndex {
        pages: Vec<IndexPage>,
        queries: Mutex<Vec<IndexQuery>>,
    }

    impl ScriptedIndex {
        fn new(pages: Vec<IndexPage>) -> Self {
            Self {
                pages,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    impl IndexingQuery for ScriptedIndex {
        async fn query_page(&self, query: &IndexQuery) -> Result<IndexPage, DiscoveryError> {
            let mut queries = self.queries.lock().unwrap();
            queries.push(query.clone());
            Ok(self.pages[queries.len() - 1].clone())
        }
    }

    struct FailingIndex;

    impl IndexingQuery for FailingIndex {
        async fn query_page(&self, _query: &IndexQuery) -> Result<IndexPage, DiscoveryError> {
            Err(DiscoveryError::Status(502))
        }
    }

    fn filter(filter_noise: bool) -> CategoryFilter {
        CategoryFilter {
            serving_nodes: vec!["http://node-a.local".to_string()],
            match_tags: vec![TagMatch {
                name: "Type".to_string(),
                values: vec!["Page".to_string()],
            }],
            min_block_height: Some(100),
            filter_noise,
        }
    }

    fn entries(prefix: &str, n: usize) -> Vec<IndexEntry> {
        (0..n)
            .map(|i| IndexEntry {
                id: format!("{prefix}-{i}"),
                tags: vec![Tag::new("Type", "Page")],
                cursor: Some(format!("{prefix}-cursor-{i}")),
            })
            .collect()
    }

    #[tokio::test]
    async fn aggregates_all_pages_with_exactly_one_query_each() {
        let index = ScriptedIndex::new(vec![
            IndexPage {
                count: 300,
                data: entries("a", 100),
                next_cursor: Some("cursor-1".to_string()),
            },
            IndexPage {
                count: 300,
                data: entries("b", 100),
                next_cursor: Some("cursor-2".to_string()),
            },
            IndexPage {
                count: 300,
                data: entries("c", 100),
                next_cursor: None,
            },
        ]);

        let records = discover(&index, &filter(false)).await.unwrap();
        assert_eq!(records.len(), 300);
        assert_eq!(index.query_count(), 3);

        // Arrival order is preserved across pages.
        assert_eq!(records[0].id, "a-0");
        assert_eq!(records[100].id, "b-0");
        assert_eq!(records[299].id, "c-99");

        // Cursors thread through: first query bare, then each continuation.
        let queries = index.queries.lock().unwrap();
        assert_eq!(queries[0].cursor, None);
        assert_eq!(queries[1].cursor.as_deref(), Some("cursor-1"));
        assert_eq!(queries[2].cursor.as_deref(), Some("cursor-2"));
        assert_eq!(queries[2].min_block_height, Some(100));
    }

    #[tokio::test]
    async fn noise_filtering_drops_only_matching_records() {
        let index = ScriptedIndex::new(vec![IndexPage {
            count: 3,
            data: vec![
                IndexEntry {
                    id: "keep-1".to_string(),
                    tags: vec![Tag::new("Title", "Production page")],
                    cursor: None,
                },
                IndexEntry {
                    id: "drop-1".to_string(),
                    tags: vec![Tag::new("Title", "Test-Asset")],
                    cursor: None,
                },
                IndexEntry {
                    id: "keep-2".to_string(),
                    tags: vec![Tag::new("Title", "Landing page")],
                    cursor: None,
                },
            ],
            next_cursor: None,
        }]);

        let records = discover(&index, &filter(true)).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["keep-1", "keep-2"]);
    }

    #[tokio::test]
    async fn noise_records_kept_when_filtering_off() {
        let index = ScriptedIndex::new(vec![IndexPage {
            count: 1,
            data: vec![IndexEntry {
                id: "p1".to_string(),
                tags: vec![Tag::new("Title", "Test-Asset")],
                cursor: None,
            }],
            next_cursor: None,
        }]);

        let records = discover(&index, &filter(false)).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn query_failure_aborts_discovery() {
        let err = discover(&FailingIndex, &filter(false)).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Status(502)));
    }

    #[tokio::test]
    async fn cached_results_skip_the_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiscoveryCache::new(dir.path());

        let index = ScriptedIndex::new(vec![IndexPage {
            count: 2,
            data: entries("a", 2),
            next_cursor: None,
        }]);

        let first = discover_with_cache(&index, &cache, "pages", &filter(false))
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(index.query_count(), 1);

        // Second run must be served entirely from disk.
        let second = discover_with_cache(&index, &cache, "pages", &filter(false))
            .await
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(index.query_count(), 1);
    }
}
