//! Search index service implementation.
//!
//! This module provides the main service for interacting with the search indexes.
//! Application code uses this to drain every document matching a field predicate
//! and to upsert enriched documents.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::SearchIndexServiceConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{IndexDocumentRequest, MatchQuery, QueryHit, SearchPage};

/// The main service for interacting with the search indexes.
///
/// This is the high-level API that application code should use. It provides input
/// validation and pagination, and delegates to a `SearchIndexProvider` for actual
/// backend operations. All operations return `SearchIndexError` for consistent
/// error handling.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use book_enricher_repository::opensearch::{ConnectionConfig, OpenSearchProvider};
/// use book_enricher_repository::{MatchQuery, SearchIndexService};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = OpenSearchProvider::new(&ConnectionConfig::new("http://localhost:9200")).await?;
/// let service = SearchIndexService::new(Arc::new(provider));
///
/// let query = MatchQuery::new("isbn-by-day", "crawled_date", "2024-02-14");
/// let hits = service.fetch_all(&query, &CancellationToken::new()).await?;
/// println!("{} matching documents", hits.len());
/// # Ok(())
/// # }
/// ```
pub struct SearchIndexService {
    provider: Arc<dyn SearchIndexProvider>,
    config: SearchIndexServiceConfig,
}

impl SearchIndexService {
    /// Create a new SearchIndexService with default configuration.
    ///
    /// The default configuration requests 1000 hits per page.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexServiceConfig::default(),
        }
    }

    /// Create a new SearchIndexService with custom configuration.
    pub fn with_config(
        provider: Arc<dyn SearchIndexProvider>,
        config: SearchIndexServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    fn validate_not_empty(field_name: &str, value: &str) -> Result<(), SearchIndexError> {
        if value.trim().is_empty() {
            return Err(SearchIndexError::validation(format!(
                "{} is required",
                field_name
            )));
        }
        Ok(())
    }

    /// Check that the backend is reachable.
    pub async fn check_ready(&self) -> Result<(), SearchIndexError> {
        self.provider.ping().await
    }

    /// Retrieve every document matching `query`, across as many pages as needed.
    ///
    /// Pages are requested with an explicit page size and an advancing offset until the
    /// number of hits collected reaches the total reported by the backend. An empty page
    /// before that point does not end pagination; the offset still advances. Once the
    /// offset has moved past the reported total without collecting every hit, draining
    /// stops with a warning rather than looping forever.
    ///
    /// Hit order is whatever the backend returns and must not be relied upon.
    ///
    /// # Arguments
    ///
    /// * `query` - Index, field and value to match
    /// * `cancel` - Token checked before and during every page request
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<QueryHit>)` - Every matching document's field mapping
    /// * `Err(SearchIndexError::ValidationError)` - If the query or page size is invalid
    /// * `Err(SearchIndexError::Cancelled)` - If `cancel` fired
    /// * `Err(SearchIndexError)` - If any page request fails or cannot be decoded
    pub async fn fetch_all(
        &self,
        query: &MatchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<QueryHit>, SearchIndexError> {
        Self::validate_not_empty("index", &query.index)?;
        Self::validate_not_empty("field", &query.field)?;
        Self::validate_not_empty("value", &query.value)?;

        let size = self.config.page_size;
        if size == 0 {
            return Err(SearchIndexError::validation("page_size must be positive"));
        }

        let mut all_hits: Vec<QueryHit> = Vec::new();
        let mut from = 0usize;
        let mut pages = 0usize;

        loop {
            if cancel.is_cancelled() {
                return Err(SearchIndexError::cancelled(format!(
                    "fetch_all on '{}' cancelled after {} pages",
                    query.index, pages
                )));
            }

            let page: SearchPage = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(SearchIndexError::cancelled(format!(
                        "fetch_all on '{}' cancelled during page {}",
                        query.index, pages + 1
                    )));
                }
                page = self.provider.search_page(query, from, size) => page?,
            };
            pages += 1;

            let total = usize::try_from(page.total).unwrap_or(usize::MAX);
            all_hits.extend(page.hits);

            if all_hits.len() >= total {
                break;
            }

            if from.saturating_add(size) >= total {
                warn!(
                    index = %query.index,
                    collected = all_hits.len(),
                    total = total,
                    pages = pages,
                    "Backend returned fewer hits than its reported total; stopping pagination"
                );
                break;
            }

            from += size;
        }

        debug!(
            index = %query.index,
            field = %query.field,
            hits = all_hits.len(),
            pages = pages,
            "Drained search query"
        );
        Ok(all_hits)
    }

    /// Upsert a document under its id through an ingest pipeline.
    ///
    /// Indexing the same id again replaces the earlier document, which keeps
    /// re-processing of an identifier idempotent.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was created or replaced
    /// * `Err(SearchIndexError::ValidationError)` - If index, id or pipeline is empty
    /// * `Err(SearchIndexError)` - If the operation fails
    pub async fn upsert(&self, request: IndexDocumentRequest) -> Result<(), SearchIndexError> {
        Self::validate_not_empty("index", &request.index)?;
        Self::validate_not_empty("id", &request.id)?;
        Self::validate_not_empty("pipeline", &request.pipeline)?;

        self.provider.index_document(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Provider backed by an in-memory list of documents.
    struct MockProvider {
        documents: Vec<QueryHit>,
        search_calls: AtomicUsize,
        /// Zero-based page index that comes back empty once, as an ordering quirk.
        empty_page: Option<usize>,
        /// Page index at which the provider fails.
        fail_on_page: Option<usize>,
        indexed: Mutex<Vec<IndexDocumentRequest>>,
    }

    impl MockProvider {
        fn with_documents(count: usize) -> Self {
            let documents = (0..count)
                .map(|i| {
                    let mut hit = QueryHit::new();
                    hit.insert("isbn".to_string(), json!(format!("isbn-{}", i)));
                    hit
                })
                .collect();
            Self {
                documents,
                search_calls: AtomicUsize::new(0),
                empty_page: None,
                fail_on_page: None,
                indexed: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn ping(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn search_page(
            &self,
            _query: &MatchQuery,
            from: usize,
            size: usize,
        ) -> Result<SearchPage, SearchIndexError> {
            let page_index = self.search_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_page == Some(page_index) {
                return Err(SearchIndexError::query("Mock failure"));
            }

            let hits = if self.empty_page == Some(page_index) {
                Vec::new()
            } else {
                let end = (from + size).min(self.documents.len());
                self.documents.get(from..end).unwrap_or_default().to_vec()
            };

            Ok(SearchPage {
                total: self.documents.len() as u64,
                hits,
            })
        }

        async fn index_document(
            &self,
            request: &IndexDocumentRequest,
        ) -> Result<(), SearchIndexError> {
            self.indexed.lock().await.push(request.clone());
            Ok(())
        }
    }

    fn query() -> MatchQuery {
        MatchQuery::new("isbn-by-day", "crawled_date", "2024-02-14")
    }

    fn isbns(hits: &[QueryHit]) -> HashSet<String> {
        hits.iter()
            .filter_map(|h| h.get("isbn").and_then(|v| v.as_str()).map(str::to_string))
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_all_drains_every_page() {
        let provider = Arc::new(MockProvider::with_documents(2500));
        let service = SearchIndexService::new(provider.clone());

        let hits = service
            .fetch_all(&query(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(hits.len(), 2500);
        assert_eq!(isbns(&hits).len(), 2500);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_page_count_matches_ceiling() {
        for (count, page_size, expected_pages) in
            [(10, 5, 2), (11, 5, 3), (1, 5, 1), (5, 5, 1), (7, 1, 7)]
        {
            let provider = Arc::new(MockProvider::with_documents(count));
            let service = SearchIndexService::with_config(
                provider.clone(),
                SearchIndexServiceConfig::with_page_size(page_size),
            );

            let hits = service
                .fetch_all(&query(), &CancellationToken::new())
                .await
                .unwrap();

            assert_eq!(hits.len(), count);
            assert_eq!(isbns(&hits).len(), count);
            assert_eq!(
                provider.calls(),
                expected_pages,
                "count={} page_size={}",
                count,
                page_size
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_all_empty_result_issues_one_request() {
        let provider = Arc::new(MockProvider::with_documents(0));
        let service = SearchIndexService::new(provider.clone());

        let hits = service
            .fetch_all(&query(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(hits.is_empty());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_continues_past_empty_intermediate_page() {
        let mut provider = MockProvider::with_documents(30);
        provider.empty_page = Some(1);
        let provider = Arc::new(provider);
        let service = SearchIndexService::with_config(
            provider.clone(),
            SearchIndexServiceConfig::with_page_size(10),
        );

        let hits = service
            .fetch_all(&query(), &CancellationToken::new())
            .await
            .unwrap();

        // The empty page does not end pagination early.
        assert_eq!(provider.calls(), 3);
        assert_eq!(hits.len(), 20);
    }

    #[tokio::test]
    async fn test_fetch_all_propagates_page_failure() {
        let mut provider = MockProvider::with_documents(30);
        provider.fail_on_page = Some(1);
        let service = SearchIndexService::with_config(
            Arc::new(provider),
            SearchIndexServiceConfig::with_page_size(10),
        );

        let result = service.fetch_all(&query(), &CancellationToken::new()).await;
        assert!(matches!(result, Err(SearchIndexError::QueryError(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_honours_cancellation() {
        let provider = Arc::new(MockProvider::with_documents(30));
        let service = SearchIndexService::new(provider.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = service.fetch_all(&query(), &cancel).await;
        assert!(matches!(result, Err(SearchIndexError::Cancelled(_))));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_all_rejects_empty_field() {
        let service = SearchIndexService::new(Arc::new(MockProvider::with_documents(1)));
        let bad = MatchQuery::new("isbn-by-day", "", "2024-02-14");

        let result = service.fetch_all(&bad, &CancellationToken::new()).await;
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_rejects_zero_page_size() {
        let service = SearchIndexService::with_config(
            Arc::new(MockProvider::with_documents(1)),
            SearchIndexServiceConfig::with_page_size(0),
        );

        let result = service.fetch_all(&query(), &CancellationToken::new()).await;
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_upsert_forwards_request() {
        let provider = Arc::new(MockProvider::with_documents(0));
        let service = SearchIndexService::new(provider.clone());

        let request = IndexDocumentRequest {
            index: "books".to_string(),
            id: "9788966262281".to_string(),
            document: json!({ "title": "Clean Code" }),
            pipeline: "book-embedding".to_string(),
        };
        service.upsert(request.clone()).await.unwrap();

        let indexed = provider.indexed.lock().await;
        assert_eq!(indexed.len(), 1);
        assert_eq!(indexed[0], request);
    }

    #[tokio::test]
    async fn test_upsert_requires_id() {
        let service = SearchIndexService::new(Arc::new(MockProvider::with_documents(0)));

        let request = IndexDocumentRequest {
            index: "books".to_string(),
            id: " ".to_string(),
            document: json!({}),
            pipeline: "book-embedding".to_string(),
        };
        let result = service.upsert(request).await;
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }
}
