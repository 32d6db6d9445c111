//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::connection_config::ConnectionConfig;
use crate::types::{IndexDocumentRequest, MatchQuery, SearchPage};

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use book_enricher_repository::opensearch::{ConnectionConfig, OpenSearchProvider};
/// use book_enricher_repository::MatchQuery;
///
/// let provider = OpenSearchProvider::new(&ConnectionConfig::new("http://localhost:9200")).await?;
/// let page = provider
///     .search_page(&MatchQuery::new("isbn-by-day", "crawled_date", "2024-02-14"), 0, 1000)
///     .await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the configured URL.
    ///
    /// # Arguments
    ///
    /// * `config` - Cluster URL and optional basic-auth credentials
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(config: &ConnectionConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some((username, password)) = config.basic_auth() {
            builder = builder.auth(Credentials::Basic(
                username.to_string(),
                password.to_string(),
            ));
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %config.url,
            authenticated = config.basic_auth().is_some(),
            "Created OpenSearch provider"
        );

        Ok(Self { client })
    }

    /// Build the body of a paginated `match` query.
    ///
    /// The page size is always explicit so the backend default never applies.
    fn match_query_body(query: &MatchQuery, from: usize, size: usize) -> Value {
        let mut field = serde_json::Map::new();
        field.insert(query.field.clone(), json!(query.value));

        json!({
            "query": {
                "match": field
            },
            "size": size,
            "from": from
        })
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::connection(format!(
                "Ping failed with status {}",
                status
            )));
        }

        debug!("OpenSearch ping succeeded");
        Ok(())
    }

    /// Fetch one page of documents matching `query`.
    ///
    /// API reference: https://docs.opensearch.org/latest/api-reference/search/
    async fn search_page(
        &self,
        query: &MatchQuery,
        from: usize,
        size: usize,
    ) -> Result<SearchPage, SearchIndexError> {
        let body = Self::match_query_body(query, from, size);

        let response = self
            .client
            .search(SearchParts::Index(&[query.index.as_str()]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let page = SearchPage::from_response(raw)?;

        debug!(
            index = %query.index,
            from = from,
            size = size,
            returned = page.hits.len(),
            total = page.total,
            "Fetched search page"
        );
        Ok(page)
    }

    /// Index a document under its id through the configured ingest pipeline.
    ///
    /// API reference: https://docs.opensearch.org/latest/api-reference/document-apis/index-document/
    async fn index_document(
        &self,
        request: &IndexDocumentRequest,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .index(IndexParts::IndexId(&request.index, &request.id))
            .pipeline(&request.pipeline)
            .body(&request.document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(
            index = %request.index,
            doc_id = %request.id,
            pipeline = %request.pipeline,
            "Document indexed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_query_body() {
        let query = MatchQuery::new("isbn-by-day", "crawled_date", "2024-02-14");
        let body = OpenSearchProvider::match_query_body(&query, 2000, 1000);

        assert_eq!(
            body,
            json!({
                "query": { "match": { "crawled_date": "2024-02-14" } },
                "size": 1000,
                "from": 2000
            })
        );
    }

    #[test]
    fn test_match_query_body_uses_field_name_verbatim() {
        let query = MatchQuery::new("books", "meta.crawled-date", "2024-02-14");
        let body = OpenSearchProvider::match_query_body(&query, 0, 10);

        assert_eq!(
            body["query"]["match"]["meta.crawled-date"],
            json!("2024-02-14")
        );
        assert_eq!(body["from"], json!(0));
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_url() {
        let result = OpenSearchProvider::new(&ConnectionConfig::new("not a url")).await;
        assert!(matches!(result, Err(SearchIndexError::ConnectionError(_))));
    }
}
