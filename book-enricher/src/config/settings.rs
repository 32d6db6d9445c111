//! Process configuration read once at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::EnricherError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default identifier field read from source hits.
const DEFAULT_IDENTIFIER_FIELD: &str = "isbn";

/// Default new-image field holding the change timestamp.
const DEFAULT_EVENT_TIME_FIELD: &str = "crawling_time";

const DEFAULT_QUERY_PAGE_SIZE: usize = 1000;
const DEFAULT_ENRICH_CONCURRENCY: usize = 1;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Every setting the enricher needs, resolved from the environment.
///
/// Components never read the environment themselves; they receive the pieces
/// of this value they need through their constructors.
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    pub opensearch_url: String,
    pub opensearch_username: Option<String>,
    pub opensearch_password: Option<String>,
    pub source_index: String,
    pub target_index: String,
    pub lookup_field: String,
    pub identifier_field: String,
    pub event_time_field: String,
    pub ingest_pipeline: String,
    pub catalog_api_url: String,
    pub catalog_client_id: String,
    pub catalog_client_secret: String,
    pub query_page_size: usize,
    pub enrich_concurrency: usize,
    pub http_timeout: Duration,
}

impl EnricherConfig {
    /// Read the configuration from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_USERNAME` / `OPENSEARCH_PASSWORD`: Basic auth, both or neither
    /// - `SOURCE_INDEX_NAME`: Index holding identifiers by crawl date (required)
    /// - `TARGET_INDEX_NAME`: Index receiving enriched documents (required)
    /// - `LOOKUP_FIELD_NAME`: Date field queried in the source index (required)
    /// - `IDENTIFIER_FIELD_NAME`: Identifier field in source hits (default: isbn)
    /// - `EVENT_TIME_FIELD`: Timestamp field in the change record (default: crawling_time)
    /// - `INGEST_PIPELINE`: Ingest pipeline applied on upsert (required)
    /// - `CATALOG_API_URL`, `CATALOG_CLIENT_ID`, `CATALOG_CLIENT_SECRET`: Catalog API (required)
    /// - `QUERY_PAGE_SIZE`: Hits per search page (default: 1000)
    /// - `ENRICH_CONCURRENCY`: Identifiers enriched at once (default: 1)
    /// - `HTTP_TIMEOUT_SECS`: Catalog HTTP timeout (default: 30)
    pub fn from_env() -> Result<Self, EnricherError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `EnricherError::ConfigError` if a required variable is missing or
    /// empty, a numeric variable does not parse, or only one half of the
    /// OpenSearch credentials is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EnricherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| {
                EnricherError::config(format!("{} environment variable is required", key))
            })
        };

        let opensearch_username = get("OPENSEARCH_USERNAME");
        let opensearch_password = get("OPENSEARCH_PASSWORD");
        if opensearch_username.is_some() != opensearch_password.is_some() {
            return Err(EnricherError::config(
                "OPENSEARCH_USERNAME and OPENSEARCH_PASSWORD must be set together",
            ));
        }

        let query_page_size = parse_or(
            get("QUERY_PAGE_SIZE"),
            "QUERY_PAGE_SIZE",
            DEFAULT_QUERY_PAGE_SIZE,
        )?;
        if query_page_size == 0 {
            return Err(EnricherError::config("QUERY_PAGE_SIZE must be positive"));
        }

        Ok(Self {
            opensearch_url: get("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            opensearch_username,
            opensearch_password,
            source_index: required("SOURCE_INDEX_NAME")?,
            target_index: required("TARGET_INDEX_NAME")?,
            lookup_field: required("LOOKUP_FIELD_NAME")?,
            identifier_field: get("IDENTIFIER_FIELD_NAME")
                .unwrap_or_else(|| DEFAULT_IDENTIFIER_FIELD.to_string()),
            event_time_field: get("EVENT_TIME_FIELD")
                .unwrap_or_else(|| DEFAULT_EVENT_TIME_FIELD.to_string()),
            ingest_pipeline: required("INGEST_PIPELINE")?,
            catalog_api_url: required("CATALOG_API_URL")?,
            catalog_client_id: required("CATALOG_CLIENT_ID")?,
            catalog_client_secret: required("CATALOG_CLIENT_SECRET")?,
            query_page_size,
            enrich_concurrency: parse_or(
                get("ENRICH_CONCURRENCY"),
                "ENRICH_CONCURRENCY",
                DEFAULT_ENRICH_CONCURRENCY,
            )?
            .max(1),
            http_timeout: Duration::from_secs(parse_or(
                get("HTTP_TIMEOUT_SECS"),
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, EnricherError>
where
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| EnricherError::config(format!("{} is invalid ({}): {}", key, raw, e))),
        None => Ok(default),
    }
}
