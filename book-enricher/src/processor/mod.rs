//! Processor module for the book enricher.
//!
//! Validates raw catalog records and normalizes them into index documents.

mod refiner;

pub use refiner::{collapse_newlines, derive_search, escape_text, BookRefiner};
