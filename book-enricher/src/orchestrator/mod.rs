//! Orchestrator module for the book enricher.
//!
//! Coordinates the consumer, fetcher, processor, and loader components.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use book_enricher_repository::{MatchQuery, QueryHit, SearchIndexService};
use book_enricher_shared::format_iso_date;

use crate::consumer::{ChangeBatch, ChangeEvent, ChangeEventType};
use crate::errors::IngestError;
use crate::fetcher::CatalogFetcher;
use crate::loader::SearchLoader;
use crate::processor::BookRefiner;

/// Settings for the enrichment flow.
#[derive(Debug, Clone)]
pub struct EnricherSettings {
    /// Index holding identifiers by crawl date.
    pub source_index: String,
    /// Date field matched in the source index.
    pub lookup_field: String,
    /// Identifier field read from each source hit.
    pub identifier_field: String,
    /// New-image field holding the change timestamp.
    pub event_time_field: String,
    /// Maximum number of identifiers enriched at once.
    pub concurrency: usize,
}

/// What happened to a single identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierOutcome {
    /// The refined document was written to the target index.
    Upserted,
    /// The record had no table of contents and was not indexed.
    Skipped,
    /// Fetching or upserting failed; the reason has been logged.
    Failed(String),
}

/// Totals for one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub events_received: u64,
    /// Events whose lookup date or identifier query failed.
    pub events_abandoned: u64,
    pub identifiers_seen: u64,
    pub upserted: u64,
    pub skipped: u64,
    pub failed: u64,
}

#[derive(Default)]
struct RunCounters {
    events_abandoned: AtomicU64,
    identifiers_seen: AtomicU64,
    upserted: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl RunCounters {
    fn record(&self, outcome: &IdentifierOutcome) {
        let counter = match outcome {
            IdentifierOutcome::Upserted => &self.upserted,
            IdentifierOutcome::Skipped => &self.skipped,
            IdentifierOutcome::Failed(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn summary(&self, events_received: u64) -> EnrichmentSummary {
        EnrichmentSummary {
            events_received,
            events_abandoned: self.events_abandoned.load(Ordering::Relaxed),
            identifiers_seen: self.identifiers_seen.load(Ordering::Relaxed),
            upserted: self.upserted.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Enricher that drives one change batch through lookup, fetch, refine and upsert.
///
/// The enricher:
/// - Derives the crawl date of every change event
/// - Drains the identifiers crawled on that date from the source index
/// - Fetches, refines and upserts each identifier independently
///
/// Failures are contained at the narrowest level: a bad event is abandoned, a
/// failed identifier is counted, and the batch still completes. Only a document
/// that cannot be serialized stops the run.
pub struct Enricher {
    source: Arc<SearchIndexService>,
    fetcher: Arc<dyn CatalogFetcher>,
    refiner: BookRefiner,
    loader: SearchLoader,
    settings: EnricherSettings,
}

impl Enricher {
    pub fn new(
        source: Arc<SearchIndexService>,
        fetcher: Arc<dyn CatalogFetcher>,
        refiner: BookRefiner,
        loader: SearchLoader,
        settings: EnricherSettings,
    ) -> Self {
        Self {
            source,
            fetcher,
            refiner,
            loader,
            settings,
        }
    }

    /// Process every event of a change batch.
    ///
    /// Events are handled in order. Cancelling `cancel` stops the run before the
    /// next event and aborts any in-flight identifier query.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::SerializationError` if a refined document could not be
    /// serialized. Every other failure is logged and reflected in the summary.
    #[instrument(skip(self, batch, cancel), fields(record_count = batch.len()))]
    pub async fn run(
        &self,
        batch: ChangeBatch,
        cancel: &CancellationToken,
    ) -> Result<EnrichmentSummary, IngestError> {
        let counters = RunCounters::default();
        let events_received = batch.len() as u64;

        for event in &batch.records {
            if cancel.is_cancelled() {
                warn!("Enrichment cancelled, remaining events not processed");
                break;
            }

            if let Err(e) = self.process_event(event, cancel, &counters).await {
                if e.is_fatal() {
                    error!(event_id = %event.event_id, error = %e, "Aborting enrichment run");
                    return Err(e);
                }
                counters.events_abandoned.fetch_add(1, Ordering::Relaxed);
                warn!(event_id = %event.event_id, error = %e, "Abandoned change event");
            }
        }

        let summary = counters.summary(events_received);
        info!(
            events = summary.events_received,
            abandoned = summary.events_abandoned,
            identifiers = summary.identifiers_seen,
            upserted = summary.upserted,
            skipped = summary.skipped,
            failed = summary.failed,
            "Enrichment run completed"
        );
        Ok(summary)
    }

    #[instrument(skip(self, event, cancel, counters), fields(event_id = %event.event_id))]
    async fn process_event(
        &self,
        event: &ChangeEvent,
        cancel: &CancellationToken,
        counters: &RunCounters,
    ) -> Result<(), IngestError> {
        let event_type = event.event_type();
        if event_type != ChangeEventType::Insert {
            info!(event_name = %event.event_name, "Processing non-insert change event");
        }

        let date = format_iso_date(&event.lookup_date(&self.settings.event_time_field)?);
        debug!(lookup_date = %date, "Derived lookup date");

        let query = MatchQuery::new(
            &self.settings.source_index,
            &self.settings.lookup_field,
            &date,
        );
        let hits = self.source.fetch_all(&query, cancel).await?;

        let identifiers = self.identifiers(&hits);
        info!(
            lookup_date = %date,
            hits = hits.len(),
            identifiers = identifiers.len(),
            "Resolved identifiers for change event"
        );

        let concurrency = self.settings.concurrency.max(1);
        stream::iter(identifiers)
            .map(|identifier| async move {
                counters.identifiers_seen.fetch_add(1, Ordering::Relaxed);
                let outcome = self.enrich_identifier(&identifier).await?;
                counters.record(&outcome);
                Ok::<_, IngestError>(outcome)
            })
            .buffer_unordered(concurrency)
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }

    fn identifiers(&self, hits: &[QueryHit]) -> Vec<String> {
        let field = &self.settings.identifier_field;
        hits.iter()
            .filter_map(|hit| match hit.get(field).and_then(|v| v.as_str()) {
                Some(id) => Some(id.to_string()),
                None => {
                    warn!(field = %field, "Source hit has no string identifier, skipping");
                    None
                }
            })
            .collect()
    }

    /// Fetch, refine and upsert one identifier.
    ///
    /// # Errors
    ///
    /// Only a fatal error is returned; a fetch or upsert failure is reported as
    /// [`IdentifierOutcome::Failed`].
    #[instrument(skip(self))]
    pub async fn enrich_identifier(&self, isbn: &str) -> Result<IdentifierOutcome, IngestError> {
        let raw = match self.fetcher.fetch(isbn).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed");
                return Ok(IdentifierOutcome::Failed(e.to_string()));
            }
        };

        let Some(document) = self.refiner.refine(raw) else {
            return Ok(IdentifierOutcome::Skipped);
        };

        match self.loader.load(isbn, &document).await {
            Ok(()) => Ok(IdentifierOutcome::Upserted),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => Ok(IdentifierOutcome::Failed(e.to_string())),
        }
    }
}
