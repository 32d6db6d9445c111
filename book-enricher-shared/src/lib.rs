//! # Book Enricher Shared
//!
//! This crate defines the value types that flow through the book enrichment
//! pipeline: the raw record assembled from the external catalog, the refined
//! document written to the search index, and the compact date normalizer used
//! by both the change-event reader and the refiner.

pub mod date;
pub mod types;

pub use date::{format_iso_date, normalize_compact_date, DateError};
pub use types::book_document::BookDocument;
pub use types::catalog_field::{CatalogField, ABSENT_MARKER};
pub use types::raw_record::RawRecord;
