//! # Book Enricher Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search indexes used by the book enricher: draining every document that
//! matches a field predicate, and upserting enriched documents through an
//! ingest pipeline. It includes definitions for errors, interfaces, and a
//! concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod service;
pub mod types;

pub use config::SearchIndexServiceConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use service::SearchIndexService;
pub use types::{IndexDocumentRequest, MatchQuery, QueryHit, SearchPage};
