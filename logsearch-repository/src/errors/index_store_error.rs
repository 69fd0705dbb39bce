//! Index store error types.
//!
//! This module defines the error types that can occur during search index
//! operations.

use thiserror::Error;

/// Errors that can occur during index store operations.
#[derive(Error, Debug, Clone)]
pub enum IndexStoreError {
    /// Failed to establish connection to the index store.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Bulk commit failed at the call level.
    #[error("Bulk commit error: {0}")]
    BulkCommitError(String),

    /// Search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Index existence check or creation failed.
    #[error("Index management error: {0}")]
    IndexManagementError(String),

    /// Retention policy or index template provisioning failed.
    #[error("Provisioning error: {0}")]
    ProvisioningError(String),

    /// Failed to parse a response from the index store.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl IndexStoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a bulk commit error.
    pub fn bulk_commit(msg: impl Into<String>) -> Self {
        Self::BulkCommitError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an index management error.
    pub fn index_management(msg: impl Into<String>) -> Self {
        Self::IndexManagementError(msg.into())
    }

    /// Create a provisioning error.
    pub fn provisioning(msg: impl Into<String>) -> Self {
        Self::ProvisioningError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
