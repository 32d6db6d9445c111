//! Catalog fetching.
//!
//! Retrieves the catalog entry for an identifier and the content scraped from
//! its rendered detail page, producing one [`RawRecord`].

mod catalog_client;
mod catalog_xml;
mod detail_page;

pub use catalog_client::{
    build_raw_record, first_loadable_candidate, select_record, CatalogApiConfig,
    HttpCatalogFetcher,
};
pub use catalog_xml::{parse_catalog_response, CatalogItem};
pub use detail_page::{ContentSections, DetailPage, DetailPageParser};

use async_trait::async_trait;
use book_enricher_shared::RawRecord;

pub use crate::errors::FetchError;

/// Source of raw catalog records, keyed by identifier.
///
/// Production code uses [`HttpCatalogFetcher`]; tests substitute in-memory
/// implementations.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Fetch and extract the catalog entry for `identifier`.
    async fn fetch(&self, identifier: &str) -> Result<RawRecord, FetchError>;
}
