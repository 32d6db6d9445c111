//! Book record refiner implementation.
//!
//! Turns a [`RawRecord`] into a [`BookDocument`]: gates admissibility, escapes
//! and flattens text, derives the search field and canonicalizes the
//! publication date.

use tracing::{debug, warn};

use book_enricher_shared::{normalize_compact_date, BookDocument, CatalogField, RawRecord};

/// Character substitutions applied to free-text content fields.
const SUBSTITUTIONS: [(char, &str); 3] = [('\'', "^"), ('"', "^"), ('\\', "           ")];

/// Replace quote and backslash characters per [`SUBSTITUTIONS`].
///
/// The output never contains a substituted character, so applying it twice is
/// the same as applying it once.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => escaped.push_str(to),
            None => escaped.push(c),
        }
    }
    escaped
}

/// Replace each embedded line break (`\r\n` or `\n`) with a single space.
pub fn collapse_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ")
}

/// Build the full-text search field from the normalized content fields.
///
/// When both an introduction and a publisher review are present only the
/// introduction is appended.
pub fn derive_search(
    index_content: &str,
    introduction: &CatalogField,
    publisher_review: &CatalogField,
) -> String {
    match (introduction.as_deref(), publisher_review.as_deref()) {
        (None, None) => index_content.to_string(),
        (Some(intro), _) => format!("{}{}", index_content, intro),
        (None, Some(review)) => format!("{}{}", index_content, review),
    }
}

fn flatten(field: CatalogField) -> CatalogField {
    field.map(|v| collapse_newlines(&v))
}

fn flatten_and_escape(field: CatalogField) -> CatalogField {
    field.map(|v| escape_text(&collapse_newlines(&v)))
}

/// Refiner that validates and normalizes raw catalog records.
#[derive(Debug, Default)]
pub struct BookRefiner;

impl BookRefiner {
    pub fn new() -> Self {
        Self
    }

    /// Refine a raw record into an index document.
    ///
    /// Returns `None` when the record has no table of contents; such records
    /// are never indexed. A publication date that cannot be parsed is logged and
    /// left unset, and the document is still produced.
    pub fn refine(&self, record: RawRecord) -> Option<BookDocument> {
        if !record.is_admissible() {
            debug!(isbn = %record.isbn, "Record has no table of contents, skipping");
            return None;
        }
        let index_content = escape_text(&collapse_newlines(
            record.index_content.as_deref().unwrap_or_default(),
        ));

        let introduction = flatten_and_escape(record.introduction);
        let publisher_review = flatten_and_escape(record.publisher_review);
        let search = derive_search(&index_content, &introduction, &publisher_review);

        let pub_date = match normalize_compact_date(&record.pub_date) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!(isbn = %record.isbn, pub_date = %record.pub_date, error = %e, "Publication date could not be parsed");
                None
            }
        };

        Some(BookDocument {
            title: escape_text(&collapse_newlines(&record.title)),
            purchase_url: collapse_newlines(&record.purchase_url),
            image_url: flatten(record.image_url),
            author: flatten(record.author),
            price: record.price,
            publisher: collapse_newlines(&record.publisher),
            pub_date,
            isbn: collapse_newlines(&record.isbn),
            index_content,
            introduction,
            publisher_review,
            middle_category: flatten(record.middle_category),
            detail_category: flatten(record.detail_category),
            search,
        })
    }
}
