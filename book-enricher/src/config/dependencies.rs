//! Dependency initialization and wiring for the book enricher.

use std::sync::Arc;

use tracing::info;

use book_enricher_repository::opensearch::ConnectionConfig;
use book_enricher_repository::{
    OpenSearchProvider, SearchIndexProvider, SearchIndexService, SearchIndexServiceConfig,
};

use crate::config::EnricherConfig;
use crate::fetcher::{CatalogApiConfig, CatalogFetcher, HttpCatalogFetcher};
use crate::loader::{LoaderConfig, SearchLoader};
use crate::orchestrator::{Enricher, EnricherSettings};
use crate::processor::BookRefiner;
use crate::EnricherError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured enricher ready to run.
    pub enricher: Enricher,
}

impl Dependencies {
    /// Initialize all dependencies from the resolved configuration.
    ///
    /// The search cluster is pinged once before anything else is built, so an
    /// unreachable cluster fails startup instead of every event.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(EnricherError)` - If the cluster is unreachable or a client cannot be built
    pub async fn new(config: &EnricherConfig) -> Result<Self, EnricherError> {
        info!(
            opensearch_url = %config.opensearch_url,
            source_index = %config.source_index,
            target_index = %config.target_index,
            pipeline = %config.ingest_pipeline,
            page_size = config.query_page_size,
            concurrency = config.enrich_concurrency,
            "Initializing dependencies"
        );

        let provider = Self::connect_to_opensearch(config).await?;
        info!("OpenSearch connection established");

        let service = Arc::new(SearchIndexService::with_config(
            provider,
            SearchIndexServiceConfig::with_page_size(config.query_page_size),
        ));

        let fetcher: Arc<dyn CatalogFetcher> = Arc::new(
            HttpCatalogFetcher::new(CatalogApiConfig {
                api_url: config.catalog_api_url.clone(),
                client_id: config.catalog_client_id.clone(),
                client_secret: config.catalog_client_secret.clone(),
                timeout: config.http_timeout,
            })
            .map_err(|e| {
                EnricherError::config(format!("Failed to create catalog client: {}", e))
            })?,
        );

        let loader = SearchLoader::new(
            service.clone(),
            LoaderConfig {
                target_index: config.target_index.clone(),
                pipeline: config.ingest_pipeline.clone(),
            },
        );

        let enricher = Enricher::new(
            service,
            fetcher,
            BookRefiner::new(),
            loader,
            EnricherSettings {
                source_index: config.source_index.clone(),
                lookup_field: config.lookup_field.clone(),
                identifier_field: config.identifier_field.clone(),
                event_time_field: config.event_time_field.clone(),
                concurrency: config.enrich_concurrency,
            },
        );

        Ok(Self { enricher })
    }

    /// Create the OpenSearch provider and check the cluster answers.
    async fn connect_to_opensearch(
        config: &EnricherConfig,
    ) -> Result<Arc<dyn SearchIndexProvider>, EnricherError> {
        let mut connection = ConnectionConfig::new(&config.opensearch_url);
        if let (Some(username), Some(password)) =
            (&config.opensearch_username, &config.opensearch_password)
        {
            connection = connection.with_basic_auth(username, password);
        }

        let provider = OpenSearchProvider::new(&connection).await.map_err(|e| {
            EnricherError::config(format!("Failed to create OpenSearch provider: {}", e))
        })?;

        provider.ping().await.map_err(|e| {
            EnricherError::config(format!("Failed to connect to OpenSearch: {}", e))
        })?;

        Ok(Arc::new(provider))
    }
}
