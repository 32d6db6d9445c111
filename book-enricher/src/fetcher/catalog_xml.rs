//! Decoding of the catalog API's XML response.
//!
//! The catalog answers with an RSS-style document holding zero or more
//! `<item>` descriptors under `<channel>`.

use serde::Deserialize;

use crate::errors::FetchError;

/// One candidate entry from the catalog response, exactly as received.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogItem {
    pub title: String,
    pub link: String,
    pub author: String,
    pub discount: String,
    pub publisher: String,
    pub pubdate: String,
    pub isbn: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<CatalogItem>,
}

/// Decode the catalog response body into its candidate items, in document order.
///
/// # Errors
///
/// Returns `FetchError::Transport` if the body is not a well-formed catalog response.
pub fn parse_catalog_response(xml: &str) -> Result<Vec<CatalogItem>, FetchError> {
    let rss: Rss = quick_xml::de::from_str(xml)?;
    Ok(rss.channel.items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ITEMS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Search Result</title>
    <lastBuildDate>Wed, 14 Feb 2024 09:30:00 +0900</lastBuildDate>
    <total>2</total>
    <start>1</start>
    <display>10</display>
    <item>
      <title>클린 코드</title>
      <link>https://search.shopping.naver.com/book/catalog/32486516630</link>
      <image>https://shopping-phinf.pstatic.net/main_3248651/32486516630.jpg</image>
      <author>로버트 C. 마틴</author>
      <discount>29700</discount>
      <publisher>인사이트</publisher>
      <pubdate>20131224</pubdate>
      <isbn>9788966260959</isbn>
      <description>나쁜 코드도 돌아는 간다 &amp; 깨끗한 코드</description>
    </item>
    <item>
      <title>클린 코드 (개정판)</title>
      <link>https://search.shopping.naver.com/book/catalog/2</link>
      <image></image>
      <author/>
      <discount>31500</discount>
      <publisher>인사이트</publisher>
      <pubdate>20240101</pubdate>
      <isbn>9788966260960</isbn>
      <description></description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_items_in_order() {
        let items = parse_catalog_response(TWO_ITEMS).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.title, "클린 코드");
        assert_eq!(first.isbn, "9788966260959");
        assert_eq!(first.discount, "29700");
        assert_eq!(first.pubdate, "20131224");
        assert_eq!(first.description, "나쁜 코드도 돌아는 간다 & 깨끗한 코드");
    }

    #[test]
    fn test_empty_elements_decode_as_empty_strings() {
        let items = parse_catalog_response(TWO_ITEMS).unwrap();
        let second = &items[1];
        assert_eq!(second.author, "");
        assert_eq!(second.image, "");
        assert_eq!(second.description, "");
    }

    #[test]
    fn test_channel_without_items() {
        let xml = r#"<rss version="2.0"><channel><title>Search Result</title><total>0</total></channel></rss>"#;
        let items = parse_catalog_response(xml).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_garbage_body_is_transport_error() {
        let result = parse_catalog_response("<html><body>Service unavailable</body>");
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
