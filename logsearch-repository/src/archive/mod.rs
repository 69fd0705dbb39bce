//! Archive object store implementation.
//!
//! Raw event batches are parquet-encoded and written to an S3-compatible
//! object store under date-keyed names, one object per day per purpose.

mod client;
mod parquet;

use chrono::NaiveDate;

pub use client::S3ArchiveStore;
pub use parquet::{decode_batch, encode_batch};

/// Purpose under which every drained batch is archived.
pub const RAW_BATCH_PURPOSE: &str = "auditlogs";

/// Purpose under which the failed-commit subset is archived.
pub const FAILED_BATCH_PURPOSE: &str = "fail-auditlogs";

/// Deterministic archive object name for a purpose and date.
///
/// Flushes on the same day target the same name, so a later flush replaces
/// that day's object.
pub fn archive_object_name(purpose: &str, date: NaiveDate) -> String {
    format!("{}_{}.parquet", purpose, date.format("%Y-%m-%d"))
}
