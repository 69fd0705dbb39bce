//! Error types for the logsearch repository.

mod archive_error;
mod index_store_error;

pub use archive_error::ArchiveError;
pub use index_store_error::IndexStoreError;
