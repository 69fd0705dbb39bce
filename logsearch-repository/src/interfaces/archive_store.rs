//! Archive store trait definition.

use async_trait::async_trait;

use crate::errors::ArchiveError;

/// Abstract interface for the archive object store.
///
/// One method is enough: archives are immutable, date-keyed blobs written
/// once per flush cycle per purpose. Writing the same name twice overwrites,
/// which gives the per-day archive objects their last-flush-wins semantics.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Write `payload` under `name`, replacing any existing object.
    async fn put_object(&self, name: &str, payload: Vec<u8>) -> Result<(), ArchiveError>;
}
