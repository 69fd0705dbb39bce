//! Result types for index store operations.

/// Summary of one bulk commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Total number of documents in the batch.
    pub total: usize,
    /// Number of documents the store accepted.
    pub succeeded: usize,
    /// Positions (into the committed batch) of rejected documents.
    pub failed: Vec<usize>,
}

impl CommitSummary {
    /// Summary for a fully successful commit of `total` documents.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: Vec::new(),
        }
    }

    /// Whether any document in the batch was rejected.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
