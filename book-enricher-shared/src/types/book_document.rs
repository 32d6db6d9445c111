//! Refined book document types for the target search index.
//!
//! This module defines the document structure that is written to the search
//! engine once a raw catalog record has been validated and normalized.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::catalog_field::CatalogField;

/// Document representation for the target search index.
///
/// Keys are serialized in camelCase (`pubDate`, `indexContent`, ...). Absent
/// catalog fields are written as [`crate::ABSENT_MARKER`], and a publication
/// date that could not be parsed is written as an empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookDocument {
    pub title: String,
    pub purchase_url: String,
    pub image_url: CatalogField,
    pub author: CatalogField,
    pub price: f64,
    pub publisher: String,
    #[serde(with = "pub_date_format")]
    pub pub_date: Option<NaiveDate>,
    pub isbn: String,
    /// Always present: records without a table of contents are never refined.
    pub index_content: String,
    pub introduction: CatalogField,
    pub publisher_review: CatalogField,
    pub middle_category: CatalogField,
    pub detail_category: CatalogField,
    /// Derived full-text field.
    pub search: String,
}

mod pub_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::date::format_iso_date;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&format_iso_date(date)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        match value.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ABSENT_MARKER;

    fn sample() -> BookDocument {
        BookDocument {
            title: "Rust in Action".to_string(),
            purchase_url: "https://search.shopping.naver.com/book/catalog/1".to_string(),
            image_url: CatalogField::Absent,
            author: CatalogField::from_raw("Tim McNamara"),
            price: 32400.0,
            publisher: "Manning".to_string(),
            pub_date: NaiveDate::from_ymd_opt(2024, 2, 14),
            isbn: "9781617294556".to_string(),
            index_content: "TOC".to_string(),
            introduction: CatalogField::from_raw("Intro"),
            publisher_review: CatalogField::Absent,
            middle_category: CatalogField::from_raw("IT"),
            detail_category: CatalogField::Absent,
            search: "TOCIntro".to_string(),
        }
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["pubDate"], "2024-02-14");
        assert_eq!(value["indexContent"], "TOC");
        assert_eq!(
            value["purchaseUrl"],
            "https://search.shopping.naver.com/book/catalog/1"
        );
        assert_eq!(value["search"], "TOCIntro");
        assert_eq!(value["imageUrl"], ABSENT_MARKER);
        assert_eq!(value["publisherReview"], ABSENT_MARKER);
    }

    #[test]
    fn test_unparsed_pub_date_serializes_empty() {
        let mut doc = sample();
        doc.pub_date = None;

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["pubDate"], "");

        let back: BookDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }
}
