//! Request and response types for search index operations.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::SearchIndexError;

/// One hit returned by a search query: the document's `_source` field mapping.
///
/// Callers treat it as opaque apart from the fields they explicitly read.
pub type QueryHit = Map<String, Value>;

/// A `match` query on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    /// The index to search.
    pub index: String,
    /// The field to match on.
    pub field: String,
    /// The value the field must match.
    pub value: String,
}

impl MatchQuery {
    pub fn new(
        index: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Total number of matching documents as reported by the backend.
    pub total: u64,
    /// Hits on this page, in backend order.
    pub hits: Vec<QueryHit>,
}

impl SearchPage {
    /// Decode a raw search response body.
    ///
    /// The expected shape is `{hits: {total: {value}, hits: [{_source}]}}`.
    /// Anything else fails fast with a parse error instead of being coerced.
    pub fn from_response(body: Value) -> Result<Self, SearchIndexError> {
        let response: SearchResponse = serde_json::from_value(body)
            .map_err(|e| SearchIndexError::parse(format!("Unexpected search response: {}", e)))?;

        Ok(Self {
            total: response.hits.total.value,
            hits: response.hits.hits.into_iter().map(|hit| hit.source).collect(),
        })
    }
}

/// Request to upsert a document into an index through an ingest pipeline.
///
/// The `id` is the stable document key, so indexing the same identifier twice
/// replaces the earlier document.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocumentRequest {
    /// Target index name.
    pub index: String,
    /// Document key.
    pub id: String,
    /// Serialized document body.
    pub document: Value,
    /// Named ingest pipeline applied at index time.
    pub pipeline: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: TotalHits,
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: QueryHit,
}
