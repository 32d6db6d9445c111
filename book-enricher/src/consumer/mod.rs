//! Consumer module for the book enricher.
//!
//! Provides the change-event types delivered by the upstream trigger and a
//! loader for batches captured to disk.

mod messages;

pub use messages::{AttributeValue, ChangeBatch, ChangeEvent, ChangeEventType, StreamRecord};

use std::path::Path;

use tracing::info;

use crate::errors::IngestError;

/// Read a change batch from a JSON file.
///
/// # Errors
///
/// Returns `IngestError::EventError` if the file cannot be read or decoded.
pub async fn load_change_batch(path: impl AsRef<Path>) -> Result<ChangeBatch, IngestError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| IngestError::event(format!("cannot read {}: {}", path.display(), e)))?;

    let batch = ChangeBatch::from_json(&contents)?;
    info!(path = %path.display(), record_count = batch.len(), "Loaded change batch");
    Ok(batch)
}
