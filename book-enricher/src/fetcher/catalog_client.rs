//! HTTP catalog fetcher.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::{debug, warn};

use book_enricher_shared::{CatalogField, RawRecord};

use crate::errors::FetchError;
use crate::fetcher::catalog_xml::{parse_catalog_response, CatalogItem};
use crate::fetcher::detail_page::{DetailPage, DetailPageParser};
use crate::fetcher::CatalogFetcher;

const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";
const ISBN_QUERY_PARAM: &str = "d_isbn";

/// Credentials and endpoint of the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogApiConfig {
    pub api_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout: Duration,
}

/// Catalog fetcher backed by the catalog HTTP API and the rendered detail pages.
pub struct HttpCatalogFetcher {
    client: ReqwestClient,
    config: CatalogApiConfig,
    parser: DetailPageParser,
}

impl HttpCatalogFetcher {
    /// Build a fetcher with a shared HTTP client using the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the HTTP client cannot be built.
    pub fn new(config: CatalogApiConfig) -> Result<Self, FetchError> {
        let client = ReqwestClient::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            parser: DetailPageParser::new()?,
        })
    }

    async fn search_catalog(&self, identifier: &str) -> Result<Vec<CatalogItem>, FetchError> {
        let body = self
            .client
            .get(&self.config.api_url)
            .query(&[(ISBN_QUERY_PARAM, identifier)])
            .header(CLIENT_ID_HEADER, &self.config.client_id)
            .header(CLIENT_SECRET_HEADER, &self.config.client_secret)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_catalog_response(&body)
    }

    async fn load_detail_page(&self, url: &str) -> Result<DetailPage, FetchError> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(self.parser.parse(&html))
    }
}

#[async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    async fn fetch(&self, identifier: &str) -> Result<RawRecord, FetchError> {
        let items = self.search_catalog(identifier).await?;
        debug!(isbn = %identifier, candidates = items.len(), "Catalog search returned");

        select_record(identifier, items, |url| async move {
            self.load_detail_page(&url).await
        })
        .await
    }
}

/// Turn the catalog candidates for `identifier` into a raw record.
///
/// The first candidate whose detail page loads is used. A discount that does
/// not parse on that candidate is returned as-is; later candidates are not tried.
///
/// # Errors
///
/// * `FetchError::NotFound` - no candidates, or no candidate's page loaded
/// * `FetchError::Parse` - the chosen candidate's discount is not a finite number
pub async fn select_record<F, Fut>(
    identifier: &str,
    items: Vec<CatalogItem>,
    load: F,
) -> Result<RawRecord, FetchError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<DetailPage, FetchError>>,
{
    if items.is_empty() {
        return Err(FetchError::not_found(identifier));
    }

    let (item, page) = first_loadable_candidate(items, load)
        .await
        .ok_or_else(|| FetchError::not_found(identifier))?;

    build_raw_record(item, &page)
}

/// Walk the candidates in order and return the first one whose detail page loads.
///
/// Candidates whose page fails to load are logged and skipped.
pub async fn first_loadable_candidate<F, Fut>(
    items: Vec<CatalogItem>,
    load: F,
) -> Option<(CatalogItem, DetailPage)>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<DetailPage, FetchError>>,
{
    for item in items {
        match load(item.link.clone()).await {
            Ok(page) => return Some((item, page)),
            Err(e) => {
                warn!(link = %item.link, error = %e, "Detail page failed to load, trying next candidate");
            }
        }
    }
    None
}

/// Assemble a raw record from a catalog item and its detail page.
///
/// # Errors
///
/// Returns `FetchError::Parse` if the item's discount is not a finite number.
pub fn build_raw_record(item: CatalogItem, page: &DetailPage) -> Result<RawRecord, FetchError> {
    let introduction = CatalogField::from_raw(item.description);
    let sections = page.content_sections(introduction.is_present());

    let price = item.discount.trim().parse::<f64>().map_err(|e| {
        FetchError::parse(format!("discount '{}' is not a number: {}", item.discount, e))
    })?;
    // f64 parsing accepts NaN and infinity, which serialize as null
    if !price.is_finite() {
        return Err(FetchError::parse(format!(
            "discount '{}' is not a finite number",
            item.discount
        )));
    }

    Ok(RawRecord {
        isbn: item.isbn,
        title: item.title,
        author: CatalogField::from_raw(item.author),
        price,
        publisher: item.publisher,
        pub_date: item.pubdate,
        purchase_url: item.link,
        image_url: CatalogField::from_raw(item.image),
        index_content: sections.index_content,
        introduction,
        publisher_review: sections.publisher_review,
        middle_category: page.middle_category(),
        detail_category: page.detail_category(),
    })
}
