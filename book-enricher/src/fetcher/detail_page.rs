//! Detail-page extraction.
//!
//! The rendered detail page of a catalog entry carries the table of contents,
//! the publisher review and the category breadcrumb that the structured API
//! omits. None of these are labelled in the markup; they are recovered from
//! the position of fixed info blocks and breadcrumb anchors.

use scraper::{Html, Selector};

use book_enricher_shared::CatalogField;

use crate::errors::FetchError;

/// Selector for the content info blocks on the detail page.
pub const INFO_BLOCK_SELECTOR: &str = "div.infoItem_data_text__bUgVI";

/// Selector for the category breadcrumb anchors on the detail page.
pub const CATEGORY_SELECTOR: &str = "a.bookCatalogTop_category__LIOY2";

/// Text extracted from one detail page, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPage {
    pub info_blocks: Vec<String>,
    pub categories: Vec<String>,
}

/// Review and table-of-contents content resolved from the info blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSections {
    pub publisher_review: CatalogField,
    pub index_content: CatalogField,
}

impl DetailPage {
    /// Resolve which info blocks hold the publisher review and the table of contents.
    ///
    /// The page template places an introduction block first when the catalog has a
    /// description, followed by an optional review and then the table of contents:
    ///
    /// | description | blocks | review   | index    |
    /// |-------------|--------|----------|----------|
    /// | absent      | 2      | block 0  | block 1  |
    /// | absent      | 1      | -        | block 0  |
    /// | present     | 3      | block 1  | block 2  |
    /// | present     | 2      | -        | block 1  |
    ///
    /// Any other count leaves both sections absent.
    pub fn content_sections(&self, has_description: bool) -> ContentSections {
        let block = |i: usize| CatalogField::Present(self.info_blocks[i].clone());

        match (has_description, self.info_blocks.len()) {
            (false, 2) => ContentSections {
                publisher_review: block(0),
                index_content: block(1),
            },
            (false, 1) => ContentSections {
                publisher_review: CatalogField::Absent,
                index_content: block(0),
            },
            (true, 3) => ContentSections {
                publisher_review: block(1),
                index_content: block(2),
            },
            (true, 2) => ContentSections {
                publisher_review: CatalogField::Absent,
                index_content: block(1),
            },
            _ => ContentSections::default(),
        }
    }

    /// Mid-level category: the second breadcrumb anchor.
    pub fn middle_category(&self) -> CatalogField {
        self.category_at(1)
    }

    /// Detail-level category: the third breadcrumb anchor.
    pub fn detail_category(&self) -> CatalogField {
        self.category_at(2)
    }

    fn category_at(&self, index: usize) -> CatalogField {
        self.categories
            .get(index)
            .map_or(CatalogField::Absent, |c| CatalogField::Present(c.clone()))
    }
}

/// Parser holding the compiled detail-page selectors.
pub struct DetailPageParser {
    info_block: Selector,
    category: Selector,
}

impl DetailPageParser {
    /// Compile the detail-page selectors.
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            info_block: Self::compile(INFO_BLOCK_SELECTOR)?,
            category: Self::compile(CATEGORY_SELECTOR)?,
        })
    }

    fn compile(selector: &str) -> Result<Selector, FetchError> {
        Selector::parse(selector)
            .map_err(|e| FetchError::parse(format!("invalid selector '{}': {}", selector, e)))
    }

    /// Extract info blocks and category anchors from a rendered detail page.
    ///
    /// Each element's text is the concatenation of all its descendant text nodes.
    pub fn parse(&self, html: &str) -> DetailPage {
        let document = Html::parse_document(html);

        let info_blocks = document
            .select(&self.info_block)
            .map(|el| el.text().collect::<String>())
            .collect();
        let categories = document
            .select(&self.category)
            .map(|el| el.text().collect::<String>())
            .collect();

        DetailPage {
            info_blocks,
            categories,
        }
    }
}
