//! Archive writer for raw event batches.
//!
//! Thin composition of the parquet codec and the archive store: encode the
//! batch, name the object for the flush date, put it.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use logsearch_repository::archive::{archive_object_name, encode_batch};
use logsearch_repository::{ArchiveError, ArchiveStore};

/// Writer that archives raw event batches as date-keyed parquet objects.
pub struct ArchiveWriter {
    store: Arc<dyn ArchiveStore>,
}

impl ArchiveWriter {
    /// Create a writer backed by the given store.
    pub fn new(store: Arc<dyn ArchiveStore>) -> Self {
        Self { store }
    }

    /// Archive a batch under `{purpose}_{date}.parquet`.
    ///
    /// A later flush on the same date replaces the object.
    pub async fn archive_batch(
        &self,
        purpose: &str,
        date: NaiveDate,
        events: &[Value],
    ) -> Result<(), ArchiveError> {
        let payload = encode_batch(events)?;
        let name = archive_object_name(purpose, date);
        self.store.put_object(&name, payload).await?;

        info!(object = %name, events = events.len(), "Archived batch");
        Ok(())
    }
}
