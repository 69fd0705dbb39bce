//! Archive store error types.

use thiserror::Error;

/// Errors that can occur while archiving a batch to the object store.
///
/// Archival is the last line of durability, so callers treat every variant
/// here as unrecoverable for the affected batch.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Failed to encode the batch into its columnar form.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Failed to decode an archived batch.
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// The object store rejected or failed the write.
    #[error("Store error: {0}")]
    StoreError(String),
}

impl ArchiveError {
    /// Create an encoding error.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::EncodingError(msg.into())
    }

    /// Create a decoding error.
    pub fn decoding(msg: impl Into<String>) -> Self {
        Self::DecodingError(msg.into())
    }

    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }
}

impl From<object_store::Error> for ArchiveError {
    fn from(err: object_store::Error) -> Self {
        Self::StoreError(err.to_string())
    }
}
