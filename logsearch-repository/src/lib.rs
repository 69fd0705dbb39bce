//! # Logsearch Repository
//!
//! This crate provides traits and implementations for the two external
//! stores the logsearch system writes to: the search index (OpenSearch,
//! partitioned into daily indices) and the archive object store
//! (S3-compatible, date-keyed parquet objects). It includes definitions for
//! errors, interfaces, the search-body compiler, and the parquet batch
//! codec.

pub mod archive;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use archive::{archive_object_name, S3ArchiveStore};
pub use errors::{ArchiveError, IndexStoreError};
pub use interfaces::{ArchiveStore, IndexStore};
pub use opensearch::{build_search_body, OpenSearchIndexStore};
pub use types::CommitSummary;
