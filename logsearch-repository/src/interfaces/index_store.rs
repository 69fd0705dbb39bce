//! Index store trait definition.
//!
//! This module defines the abstract interface for the search index,
//! allowing for different backend implementations (OpenSearch, mock, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::IndexStoreError;
use crate::types::CommitSummary;
use logsearch_shared::IndexRecord;

/// Abstract interface for the search index.
///
/// The flush pipeline commits batches through this trait and the query path
/// searches through it; implementations can be swapped for mocks in tests.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Commit a batch of records in a single bulk operation.
    ///
    /// Returns a [`CommitSummary`] whose `failed` list holds the positions
    /// (into `records`) of documents the store rejected. A call-level
    /// failure is reported as an `Err`; the caller decides how to treat the
    /// whole batch in that case.
    async fn bulk_commit(&self, records: &[IndexRecord]) -> Result<CommitSummary, IndexStoreError>;

    /// Execute a search against the given index pattern.
    ///
    /// `body` is a full search request body; the result is the `_source` of
    /// each hit, in store order.
    async fn search(&self, index_pattern: &str, body: Value)
        -> Result<Vec<Value>, IndexStoreError>;

    /// Check whether an index exists.
    async fn index_exists(&self, name: &str) -> Result<bool, IndexStoreError>;

    /// Create an index with default settings.
    async fn create_index(&self, name: &str) -> Result<(), IndexStoreError>;

    /// Provision the retention policy and index template for daily indices.
    ///
    /// Called once at startup; indices matching `{prefix}-*` are deleted
    /// after `retention_days`. Re-provisioning an already-configured store
    /// must succeed.
    async fn provision(&self, prefix: &str, retention_days: u32) -> Result<(), IndexStoreError>;

    /// Report the cluster health status (e.g. `green`).
    async fn health(&self) -> Result<String, IndexStoreError>;
}
