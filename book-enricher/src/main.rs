//! Book Enricher Main Entry Point
//!
//! Reads a change batch captured from the upstream trigger, enriches every
//! identifier crawled on the changed dates and upserts the results into
//! OpenSearch.
//!
//! Usage: `book-enricher <change-batch.json>`

use std::env;

use dotenv::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use book_enricher::consumer::load_change_batch;
use book_enricher::{Dependencies, EnricherConfig, EnricherError};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), EnricherError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("book_enricher=info,book_enricher_repository=info"));

    let json_output = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| EnricherError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "book-enricher",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| EnricherError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "book-enricher",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), EnricherError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting book enricher");

    let batch_path = env::args()
        .nth(1)
        .ok_or_else(|| EnricherError::config("usage: book-enricher <change-batch.json>"))?;

    let config = EnricherConfig::from_env()?;

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let batch = load_change_batch(&batch_path).await?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received shutdown signal, cancelling enrichment");
            signal_token.cancel();
        }
    });

    match deps.enricher.run(batch, &cancel).await {
        Ok(summary) => {
            info!(
                upserted = summary.upserted,
                skipped = summary.skipped,
                failed = summary.failed,
                "Book enricher completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Book enricher failed");
            Err(e.into())
        }
    }
}
