//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{IndexDocumentRequest, MatchQuery, SearchPage};

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// This trait defines the interface for all search index backend implementations. Implementations
/// are injected into `SearchIndexService` to enable dependency injection and easy testing with
/// mock implementations.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
///
/// # Pagination
///
/// Providers only ever fetch a single page. Draining a result set across pages is the
/// service's job, so that page-size and termination rules live in one place.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check that the backend is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the backend answered
    /// * `Err(SearchIndexError)` - If the backend could not be reached
    async fn ping(&self) -> Result<(), SearchIndexError>;

    /// Fetch one page of documents matching `query`.
    ///
    /// No sort key is applied, so the relative order of hits across calls is unspecified.
    ///
    /// # Arguments
    ///
    /// * `query` - Index, field and value to match
    /// * `from` - Offset of the first hit to return
    /// * `size` - Maximum number of hits to return
    ///
    /// # Returns
    ///
    /// * `Ok(SearchPage)` - The hits on this page and the backend-reported total
    /// * `Err(SearchIndexError)` - If the request fails or the response cannot be decoded
    async fn search_page(
        &self,
        query: &MatchQuery,
        from: usize,
        size: usize,
    ) -> Result<SearchPage, SearchIndexError>;

    /// Index a document under its id, replacing any existing document with that id.
    ///
    /// # Arguments
    ///
    /// * `request` - Target index, document id, body and ingest pipeline
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was created or replaced
    /// * `Err(SearchIndexError)` - If the operation fails
    async fn index_document(&self, request: &IndexDocumentRequest)
        -> Result<(), SearchIndexError>;
}
