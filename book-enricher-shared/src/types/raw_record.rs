//! Raw catalog record types.
//!
//! A [`RawRecord`] is what one successful catalog fetch produces, before any
//! normalization has been applied.

use serde::{Deserialize, Serialize};

use crate::types::catalog_field::CatalogField;

/// One catalog entry as assembled from the structured catalog response and
/// the rendered detail page.
///
/// # Fields
///
/// - `isbn`: Identifier reported by the catalog
/// - `title`, `publisher`: Structured metadata, passed through as received
/// - `author`, `image_url`: Absent when the catalog left them empty
/// - `price`: Discounted price parsed from the catalog
/// - `pub_date`: Publication date in compact `YYYYMMDD` form
/// - `purchase_url`: Canonical detail page URL
/// - `index_content`: Table of contents scraped from the detail page
/// - `introduction`: Structured description, absent when empty
/// - `publisher_review`: Publisher review scraped from the detail page
/// - `middle_category`, `detail_category`: Breadcrumb category labels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RawRecord {
    pub isbn: String,
    pub title: String,
    pub author: CatalogField,
    pub price: f64,
    pub publisher: String,
    pub pub_date: String,
    pub purchase_url: String,
    pub image_url: CatalogField,
    pub index_content: CatalogField,
    pub introduction: CatalogField,
    pub publisher_review: CatalogField,
    pub middle_category: CatalogField,
    pub detail_category: CatalogField,
}

impl RawRecord {
    /// Whether the record carries enough content to be indexed.
    ///
    /// A record without a table of contents is never indexed.
    pub fn is_admissible(&self) -> bool {
        self.index_content.is_present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admissibility_follows_index_content() {
        let mut record = RawRecord {
            isbn: "9788966262281".to_string(),
            ..Default::default()
        };
        assert!(!record.is_admissible());

        record.index_content = CatalogField::from_raw("1장 시작하기");
        assert!(record.is_admissible());
    }
}
