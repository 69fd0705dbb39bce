//! Dependency initialization and wiring for the logsearch service.

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, RETENTION_DAYS};
use crate::ServerError;
use logsearch_pipeline::{
    ArchiveWriter, EventBuffer, FlushConfig, Flusher, InMemoryBuffer, RecordTransformer,
};
use logsearch_repository::{ArchiveStore, IndexStore, OpenSearchIndexStore, S3ArchiveStore};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared ingest buffer, appended to by the HTTP handlers.
    pub buffer: Arc<dyn EventBuffer>,
    /// Index store, also used by the query and health endpoints.
    pub index_store: Arc<dyn IndexStore>,
    /// The configured flusher, ready to run.
    pub flusher: Flusher,
}

impl Dependencies {
    /// Initialize all dependencies from the given configuration.
    ///
    /// Connects to both stores, verifies the index store is reachable, and
    /// provisions the retention policy and index template before anything
    /// is ingested.
    pub async fn new(config: &Config) -> Result<Self, ServerError> {
        let index_store: Arc<dyn IndexStore> = Arc::new(OpenSearchIndexStore::new(
            &config.opensearch_url,
            config.opensearch_credentials(),
        )?);

        let status = index_store.health().await?;
        info!(status = %status, "Index store connection verified");

        index_store
            .provision(&config.index_prefix, RETENTION_DAYS)
            .await?;

        let archive_store: Arc<dyn ArchiveStore> = Arc::new(S3ArchiveStore::new(
            &config.object_store_endpoint,
            &config.archive_bucket,
            &config.object_store_access_key,
            &config.object_store_secret_key,
        )?);

        let buffer: Arc<dyn EventBuffer> = Arc::new(InMemoryBuffer::new());

        let flusher = Flusher::with_config(
            Arc::clone(&buffer),
            RecordTransformer::new(&config.index_prefix),
            Arc::clone(&index_store),
            ArchiveWriter::new(archive_store),
            FlushConfig {
                poll_interval: config.flush_interval,
            },
        );

        Ok(Self {
            buffer,
            index_store,
            flusher,
        })
    }
}
