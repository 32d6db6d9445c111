//! # Book Enricher
//!
//! Change-triggered enrichment for the book search index. For every upstream
//! change record it looks up the ISBNs crawled on that day, fetches catalog
//! metadata and marketing copy for each one, normalizes the result and upserts
//! it into the book index through an ingest pipeline.
//!
//! ## Architecture
//!
//! The enricher follows the Consumer-Processor-Loader pattern:
//!
//! 1. **Consumer**: Reads change records and derives the lookup date
//! 2. **Fetcher**: Retrieves the catalog entry and detail page for an ISBN
//! 3. **Processor**: Validates and normalizes the raw record into a document
//! 4. **Loader**: Upserts documents into the target index
//! 5. **Orchestrator**: Coordinates the flow with bounded per-identifier concurrency
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: Change-event types and batch loading
//! - [`fetcher`]: Catalog client and detail-page extraction
//! - [`processor`]: Record refinement
//! - [`loader`]: Upserts into the target index
//! - [`orchestrator`]: Coordinates the enrichment flow
//! - [`errors`]: Error types for the enricher

pub mod config;
pub mod consumer;
pub mod errors;
pub mod fetcher;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub use config::{Dependencies, EnricherConfig};
pub use errors::{FetchError, IngestError};

use thiserror::Error;

/// Errors that can occur during enricher initialization or execution.
#[derive(Error, Debug)]
pub enum EnricherError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl EnricherError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
