//! Error types for the logsearch pipeline.

use thiserror::Error;

use logsearch_repository::ArchiveError;

/// Fatal errors surfaced by the flush cycle.
///
/// The flush cycle distinguishes two classes of failure: index-store commit
/// failures are recoverable (the affected records are archived and the loop
/// continues) and are handled internally, while the variants here terminate
/// the loop — a malformed record indicates schema drift that must not
/// silently corrupt the index, and a failed archival means the last line of
/// durability is gone. The owning supervisor decides what termination means
/// for the process.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A record in the batch is missing a required field or carries the
    /// wrong type for it.
    #[error("Malformed record: missing or mistyped field `{field}`")]
    MalformedRecord {
        /// Source path of the offending field (e.g. `api.name`).
        field: &'static str,
    },

    /// Archival of a batch failed.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

impl PipelineError {
    /// Create a malformed record error for the given source field path.
    pub fn malformed(field: &'static str) -> Self {
        Self::MalformedRecord { field }
    }
}
