//! # Logsearch
//!
//! Main library for the logsearch audit-log service.
//!
//! This crate provides the entry point, configuration, and HTTP surface for
//! running the ingestion pipeline and the query endpoint.

pub mod config;
pub mod http;

pub use config::{Config, Dependencies};

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] logsearch_pipeline::PipelineError),

    /// Index store error.
    #[error("Index store error: {0}")]
    IndexStoreError(#[from] logsearch_repository::IndexStoreError),

    /// Archive store error.
    #[error("Archive error: {0}")]
    ArchiveError(#[from] logsearch_repository::ArchiveError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A supervised task panicked or was cancelled.
    #[error("Task error: {0}")]
    TaskError(String),
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a task error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::TaskError(msg.into())
    }
}
