//! Loader module for the book enricher.
//!
//! Upserts refined documents into the target index through the ingest pipeline.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use book_enricher_repository::{IndexDocumentRequest, SearchIndexService};
use book_enricher_shared::BookDocument;

use crate::errors::IngestError;

/// Where refined documents are written.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Index receiving enriched documents.
    pub target_index: String,
    /// Ingest pipeline applied to every upsert.
    pub pipeline: String,
}

/// Loader that upserts documents into the search engine.
///
/// Each document is keyed by its identifier, so re-processing an identifier
/// replaces the earlier document instead of duplicating it.
pub struct SearchLoader {
    service: Arc<SearchIndexService>,
    config: LoaderConfig,
}

impl SearchLoader {
    pub fn new(service: Arc<SearchIndexService>, config: LoaderConfig) -> Self {
        Self { service, config }
    }

    /// Serialize `document` and upsert it under `identifier`.
    ///
    /// # Errors
    ///
    /// * `IngestError::SerializationError` - the document could not be turned into JSON
    /// * `IngestError::LoaderError` - the upsert was rejected or failed
    #[instrument(skip(self, document), fields(index = %self.config.target_index))]
    pub async fn load(&self, identifier: &str, document: &BookDocument) -> Result<(), IngestError> {
        let body = serde_json::to_value(document).map_err(|e| {
            IngestError::serialization(format!("document for {}: {}", identifier, e))
        })?;

        let request = IndexDocumentRequest {
            index: self.config.target_index.clone(),
            id: identifier.to_string(),
            document: body,
            pipeline: self.config.pipeline.clone(),
        };

        match self.service.upsert(request).await {
            Ok(()) => {
                debug!(isbn = %identifier, "Upserted document");
                Ok(())
            }
            Err(e) => {
                error!(isbn = %identifier, error = %e, "Failed to upsert document");
                Err(IngestError::loader(format!(
                    "Failed to upsert {}: {}",
                    identifier, e
                )))
            }
        }
    }

    /// Check that the target backend is reachable (for health checks).
    pub async fn check_ready(&self) -> Result<(), IngestError> {
        self.service
            .check_ready()
            .await
            .map_err(|e| IngestError::loader(format!("Search backend not ready: {}", e)))
    }
}
