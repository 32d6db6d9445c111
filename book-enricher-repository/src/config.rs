//! Configuration types for the SearchIndexService.

/// Default number of hits requested per search page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Configuration for the SearchIndexService.
///
/// The page size is always sent explicitly with each search request so that
/// pagination never depends on a backend default.
#[derive(Debug, Clone)]
pub struct SearchIndexServiceConfig {
    /// Number of hits requested per page when draining a query.
    ///
    /// Defaults to 1000 if not specified.
    pub page_size: usize,
}

impl Default for SearchIndexServiceConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchIndexServiceConfig {
    /// Create a config with a custom page size.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Number of hits requested per page; must be greater than zero
    ///
    /// # Returns
    ///
    /// A `SearchIndexServiceConfig` with the specified page size.
    pub fn with_page_size(page_size: usize) -> Self {
        Self { page_size }
    }
}
