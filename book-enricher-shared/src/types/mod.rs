//! This module defines the record types used across the book enricher.
//! It re-exports the catalog field, raw record and refined document types.

pub mod book_document;
pub mod catalog_field;
pub mod raw_record;

pub use book_document::BookDocument;
pub use catalog_field::CatalogField;
pub use raw_record::RawRecord;
