//! Flusher module for the logsearch pipeline.
//!
//! Runs the background flush cycle: drain the buffer, transform, commit to
//! the index store, archive the raw batch, and archive any failed-commit
//! subset.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::archive_writer::ArchiveWriter;
use crate::buffer::EventBuffer;
use crate::errors::PipelineError;
use crate::processor::RecordTransformer;
use logsearch_repository::archive::{FAILED_BATCH_PURPOSE, RAW_BATCH_PURPOSE};
use logsearch_repository::{IndexStore, IndexStoreError};

/// Configuration for the flusher.
#[derive(Debug, Clone)]
pub struct FlushConfig {
    /// How long to sleep between polls while the buffer stays empty.
    pub poll_interval: Duration,
}

impl Default for FlushConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Result of one flush cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The buffer was empty; nothing to do.
    Idle,
    /// A batch was processed.
    Flushed {
        /// Number of raw events drained.
        events: usize,
        /// Number of events whose commit failed (archived separately).
        failed: usize,
    },
}

/// Background flusher for the ingest buffer.
///
/// The flusher is the sole consumer of the buffer, the sole committer to
/// the index store, and the sole writer of archive objects: cycles are
/// strictly sequential, so an earlier batch is fully processed before the
/// next drain. It polls at a fixed cadence while idle and re-checks
/// immediately after a non-empty batch to drain backlog quickly.
///
/// Commit failures are recovered by archiving the affected records; a
/// malformed batch or a failed archival is fatal and ends [`Flusher::run`]
/// with an error for the supervisor to act on.
pub struct Flusher {
    buffer: Arc<dyn EventBuffer>,
    transformer: RecordTransformer,
    index_store: Arc<dyn IndexStore>,
    archive: ArchiveWriter,
    config: FlushConfig,
}

impl Flusher {
    /// Create a new flusher with the default configuration.
    pub fn new(
        buffer: Arc<dyn EventBuffer>,
        transformer: RecordTransformer,
        index_store: Arc<dyn IndexStore>,
        archive: ArchiveWriter,
    ) -> Self {
        Self {
            buffer,
            transformer,
            index_store,
            archive,
            config: FlushConfig::default(),
        }
    }

    /// Create a new flusher with custom configuration.
    pub fn with_config(
        buffer: Arc<dyn EventBuffer>,
        transformer: RecordTransformer,
        index_store: Arc<dyn IndexStore>,
        archive: ArchiveWriter,
        config: FlushConfig,
    ) -> Self {
        Self {
            buffer,
            transformer,
            index_store,
            archive,
            config,
        }
    }

    /// Run the flush loop until shutdown is signalled or a fatal error
    /// occurs.
    ///
    /// A final drain runs after the shutdown signal so buffered events are
    /// not stranded.
    pub async fn run(
        self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), PipelineError> {
        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Starting flush loop"
        );

        loop {
            match self.flush_once().await? {
                FlushOutcome::Flushed { .. } => {
                    // Re-check immediately to drain backlog, unless shutdown
                    // was requested meanwhile.
                    match shutdown.try_recv() {
                        Err(broadcast::error::TryRecvError::Empty) => continue,
                        _ => break,
                    }
                }
                FlushOutcome::Idle => {
                    tokio::select! {
                        _ = shutdown.recv() => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
            }
        }

        // Flush anything that arrived since the last cycle.
        self.flush_once().await?;

        info!("Flush loop stopped");
        Ok(())
    }

    /// Execute one flush cycle.
    ///
    /// Drains the buffer and, for a non-empty batch: transforms it (schema
    /// errors are fatal), commits it in one bulk call, archives the raw
    /// batch unconditionally, and archives the failed subset when the
    /// commit reported failures. Archival errors are fatal — past this
    /// point there is no further durability fallback.
    pub async fn flush_once(&self) -> Result<FlushOutcome, PipelineError> {
        let batch = self.buffer.drain_and_reset();
        if batch.is_empty() {
            return Ok(FlushOutcome::Idle);
        }

        let date = Utc::now().date_naive();
        debug!(events = batch.len(), "Drained batch");

        let records = self.transformer.transform(&batch, date)?;

        let index = self.transformer.index_name(date);
        if let Err(e) = self.ensure_index(&index).await {
            // The bulk commit below will fail too if the store is really
            // down, and its failure path archives the batch.
            warn!(index = %index, error = %e, "Failed to ensure daily index");
        }

        let failed_events: Vec<Value> = match self.index_store.bulk_commit(&records).await {
            Ok(summary) => {
                if summary.has_failures() {
                    warn!(
                        total = summary.total,
                        failed = summary.failed.len(),
                        "Bulk commit reported per-document failures"
                    );
                } else {
                    info!(count = summary.total, index = %index, "Committed batch");
                }
                summary
                    .failed
                    .iter()
                    .filter_map(|&position| batch.get(position).cloned())
                    .collect()
            }
            Err(e) => {
                // Call-level failure leaves every record unindexed; they are
                // all recoverable from the fallback archive.
                error!(error = %e, count = batch.len(), "Bulk commit failed");
                batch.clone()
            }
        };

        self.archive
            .archive_batch(RAW_BATCH_PURPOSE, date, &batch)
            .await?;

        if !failed_events.is_empty() {
            self.archive
                .archive_batch(FAILED_BATCH_PURPOSE, date, &failed_events)
                .await?;
        }

        Ok(FlushOutcome::Flushed {
            events: batch.len(),
            failed: failed_events.len(),
        })
    }

    /// Create the daily index if it does not exist yet.
    async fn ensure_index(&self, name: &str) -> Result<(), IndexStoreError> {
        if !self.index_store.index_exists(name).await? {
            info!(index = %name, "Index not found, creating");
            self.index_store.create_index(name).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::InMemoryBuffer;
    use async_trait::async_trait;
    use logsearch_repository::archive::{archive_object_name, decode_batch};
    use logsearch_repository::{ArchiveError, ArchiveStore, CommitSummary};
    use logsearch_shared::IndexRecord;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Mock index store capturing committed records.
    #[derive(Default)]
    struct MockIndexStore {
        committed: Mutex<Vec<IndexRecord>>,
        created_indices: Mutex<HashSet<String>>,
        fail_commit: bool,
        failed_positions: Vec<usize>,
    }

    impl MockIndexStore {
        fn failing() -> Self {
            Self {
                fail_commit: true,
                ..Self::default()
            }
        }

        fn with_failed_positions(positions: Vec<usize>) -> Self {
            Self {
                failed_positions: positions,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl IndexStore for MockIndexStore {
        async fn bulk_commit(
            &self,
            records: &[IndexRecord],
        ) -> Result<CommitSummary, IndexStoreError> {
            if self.fail_commit {
                return Err(IndexStoreError::bulk_commit("store unavailable"));
            }
            self.committed.lock().unwrap().extend_from_slice(records);
            Ok(CommitSummary {
                total: records.len(),
                succeeded: records.len() - self.failed_positions.len(),
                failed: self.failed_positions.clone(),
            })
        }

        async fn search(
            &self,
            _index_pattern: &str,
            _body: Value,
        ) -> Result<Vec<Value>, IndexStoreError> {
            Ok(vec![])
        }

        async fn index_exists(&self, name: &str) -> Result<bool, IndexStoreError> {
            Ok(self.created_indices.lock().unwrap().contains(name))
        }

        async fn create_index(&self, name: &str) -> Result<(), IndexStoreError> {
            self.created_indices.lock().unwrap().insert(name.to_string());
            Ok(())
        }

        async fn provision(
            &self,
            _prefix: &str,
            _retention_days: u32,
        ) -> Result<(), IndexStoreError> {
            Ok(())
        }

        async fn health(&self) -> Result<String, IndexStoreError> {
            Ok("green".to_string())
        }
    }

    /// Mock archive store keeping objects in memory.
    #[derive(Default)]
    struct MockArchiveStore {
        objects: Mutex<HashMap<String, Vec<u8>>>,
        fail_prefix: Option<&'static str>,
    }

    impl MockArchiveStore {
        fn failing_for(prefix: &'static str) -> Self {
            Self {
                fail_prefix: Some(prefix),
                ..Self::default()
            }
        }

        fn object(&self, name: &str) -> Option<Vec<u8>> {
            self.objects.lock().unwrap().get(name).cloned()
        }

        fn object_count(&self) -> usize {
            self.objects.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ArchiveStore for MockArchiveStore {
        async fn put_object(&self, name: &str, payload: Vec<u8>) -> Result<(), ArchiveError> {
            if let Some(prefix) = self.fail_prefix {
                if name.starts_with(prefix) {
                    return Err(ArchiveError::store("bucket unavailable"));
                }
            }
            self.objects.lock().unwrap().insert(name.to_string(), payload);
            Ok(())
        }
    }

    fn sample_event(request_id: &str) -> Value {
        json!({
            "time": "2024-01-01T00:00:00Z",
            "api": { "name": "GET", "timeToResponseInNS": 100, "status": "OK", "statusCode": 200 },
            "remotehost": "1.2.3.4",
            "requestID": request_id,
            "userAgent": "ua",
            "accessKey": "k1"
        })
    }

    fn build_flusher(
        index_store: Arc<MockIndexStore>,
        archive_store: Arc<MockArchiveStore>,
    ) -> (Arc<InMemoryBuffer>, Flusher) {
        let buffer = Arc::new(InMemoryBuffer::new());
        let flusher = Flusher::new(
            buffer.clone(),
            RecordTransformer::new("audit_log_events"),
            index_store,
            ArchiveWriter::new(archive_store),
        );
        (buffer, flusher)
    }

    #[tokio::test]
    async fn test_idle_when_buffer_empty() {
        let index_store = Arc::new(MockIndexStore::default());
        let archive_store = Arc::new(MockArchiveStore::default());
        let (_buffer, flusher) = build_flusher(index_store, archive_store.clone());

        assert_eq!(flusher.flush_once().await.unwrap(), FlushOutcome::Idle);
        assert_eq!(archive_store.object_count(), 0);
    }

    #[tokio::test]
    async fn test_flush_commits_and_archives() {
        let index_store = Arc::new(MockIndexStore::default());
        let archive_store = Arc::new(MockArchiveStore::default());
        let (buffer, flusher) = build_flusher(index_store.clone(), archive_store.clone());

        for i in 0..3 {
            buffer.append(sample_event(&format!("r{i}")));
        }

        let outcome = flusher.flush_once().await.unwrap();
        assert_eq!(outcome, FlushOutcome::Flushed { events: 3, failed: 0 });

        let today = Utc::now().date_naive();
        let index = format!("audit_log_events-{}", today.format("%Y-%m-%d"));

        // All three documents committed into the daily index, which was
        // created on the way.
        let committed = index_store.committed.lock().unwrap().clone();
        assert_eq!(committed.len(), 3);
        assert!(committed.iter().all(|r| r.index == index));
        assert!(index_store.created_indices.lock().unwrap().contains(&index));

        // One archive object holding the three raw events, no fallback.
        assert_eq!(archive_store.object_count(), 1);
        let raw = archive_store
            .object(&archive_object_name(RAW_BATCH_PURPOSE, today))
            .unwrap();
        assert_eq!(decode_batch(raw).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_commit_failure_archives_both_and_continues() {
        let index_store = Arc::new(MockIndexStore::failing());
        let archive_store = Arc::new(MockArchiveStore::default());
        let (buffer, flusher) = build_flusher(index_store, archive_store.clone());

        buffer.append(sample_event("r1"));
        buffer.append(sample_event("r2"));

        // Not fatal: archival succeeded, so the loop keeps going.
        let outcome = flusher.flush_once().await.unwrap();
        assert_eq!(outcome, FlushOutcome::Flushed { events: 2, failed: 2 });

        let today = Utc::now().date_naive();
        let raw = archive_store
            .object(&archive_object_name(RAW_BATCH_PURPOSE, today))
            .unwrap();
        let fallback = archive_store
            .object(&archive_object_name(FAILED_BATCH_PURPOSE, today))
            .unwrap();
        assert_eq!(decode_batch(raw).unwrap().len(), 2);
        assert_eq!(decode_batch(fallback).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_archives_only_failed_subset() {
        let index_store = Arc::new(MockIndexStore::with_failed_positions(vec![1]));
        let archive_store = Arc::new(MockArchiveStore::default());
        let (buffer, flusher) = build_flusher(index_store, archive_store.clone());

        buffer.append(sample_event("r0"));
        buffer.append(sample_event("r1"));
        buffer.append(sample_event("r2"));

        let outcome = flusher.flush_once().await.unwrap();
        assert_eq!(outcome, FlushOutcome::Flushed { events: 3, failed: 1 });

        let today = Utc::now().date_naive();
        let fallback = decode_batch(
            archive_store
                .object(&archive_object_name(FAILED_BATCH_PURPOSE, today))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0]["requestID"], "r1");
    }

    #[tokio::test]
    async fn test_raw_archive_failure_is_fatal() {
        let index_store = Arc::new(MockIndexStore::default());
        let archive_store = Arc::new(MockArchiveStore::failing_for("auditlogs"));
        let (buffer, flusher) = build_flusher(index_store, archive_store);

        buffer.append(sample_event("r1"));

        assert!(matches!(
            flusher.flush_once().await,
            Err(PipelineError::Archive(_))
        ));
    }

    #[tokio::test]
    async fn test_fallback_archive_failure_is_fatal() {
        let index_store = Arc::new(MockIndexStore::failing());
        let archive_store = Arc::new(MockArchiveStore::failing_for("fail-auditlogs"));
        let (buffer, flusher) = build_flusher(index_store, archive_store.clone());

        buffer.append(sample_event("r1"));

        assert!(matches!(
            flusher.flush_once().await,
            Err(PipelineError::Archive(_))
        ));
        // The raw batch still made it out before the fallback failed.
        assert_eq!(archive_store.object_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_batch_is_fatal_and_commits_nothing() {
        let index_store = Arc::new(MockIndexStore::default());
        let archive_store = Arc::new(MockArchiveStore::default());
        let (buffer, flusher) = build_flusher(index_store.clone(), archive_store.clone());

        buffer.append(sample_event("r1"));
        buffer.append(json!({"unexpected": true}));

        assert!(matches!(
            flusher.flush_once().await,
            Err(PipelineError::MalformedRecord { field: "time" })
        ));
        assert!(index_store.committed.lock().unwrap().is_empty());
        assert_eq!(archive_store.object_count(), 0);
    }

    #[tokio::test]
    async fn test_run_drains_on_shutdown() {
        let index_store = Arc::new(MockIndexStore::default());
        let archive_store = Arc::new(MockArchiveStore::default());
        let (buffer, flusher) = build_flusher(index_store.clone(), archive_store);

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(flusher.run(shutdown_rx));

        buffer.append(sample_event("r1"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        // This event may only be picked up by the final drain.
        buffer.append(sample_event("r2"));

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();

        assert_eq!(index_store.committed.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_run_surfaces_fatal_error() {
        let index_store = Arc::new(MockIndexStore::default());
        let archive_store = Arc::new(MockArchiveStore::failing_for("auditlogs"));
        let (buffer, flusher) = build_flusher(index_store, archive_store);

        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        buffer.append(sample_event("r1"));

        let result = tokio::spawn(flusher.run(shutdown_rx)).await.unwrap();
        assert!(matches!(result, Err(PipelineError::Archive(_))));
    }
}
