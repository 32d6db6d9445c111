//! Error types for the book enricher.

mod fetch;

pub use fetch::FetchError;

use book_enricher_repository::SearchIndexError;
use book_enricher_shared::DateError;
use thiserror::Error;

/// Errors that can occur in the enrichment flow.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Querying the source index failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Error from the loader component.
    #[error("Loader error: {0}")]
    LoaderError(String),

    /// A change event could not be read or its lookup date derived.
    #[error("Event error: {0}")]
    EventError(String),

    /// A validated document could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl IngestError {
    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }

    /// Create an event error.
    pub fn event(msg: impl Into<String>) -> Self {
        Self::EventError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Whether this error must stop the whole run rather than a single identifier.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SerializationError(_))
    }
}

impl From<DateError> for IngestError {
    fn from(err: DateError) -> Self {
        Self::EventError(err.to_string())
    }
}

/// A rejected document write is a loader error; anything else failed while
/// reading the source index.
impl From<SearchIndexError> for IngestError {
    fn from(err: SearchIndexError) -> Self {
        match err {
            SearchIndexError::IndexError(_) => Self::LoaderError(err.to_string()),
            _ => Self::QueryError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_index_errors_map_by_operation() {
        for err in [
            SearchIndexError::query("500"),
            SearchIndexError::parse("missing hits"),
            SearchIndexError::cancelled("page 3"),
            SearchIndexError::validation("value is required"),
        ] {
            assert!(matches!(IngestError::from(err), IngestError::QueryError(_)));
        }

        let err = IngestError::from(SearchIndexError::index("mapping conflict"));
        assert!(matches!(err, IngestError::LoaderError(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_date_error_is_event_error() {
        let err: IngestError = book_enricher_shared::normalize_compact_date("2024-01-01")
            .unwrap_err()
            .into();
        assert!(matches!(err, IngestError::EventError(_)));
    }
}
