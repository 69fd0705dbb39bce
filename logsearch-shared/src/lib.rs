//! # Logsearch Shared
//!
//! Shared types and data structures for the logsearch system: the indexable
//! audit document, the index-tagged record produced by the transformer, and
//! the parsed query parameters for the search endpoint.

pub mod document;
pub mod query;

pub use document::{AuditDocument, IndexRecord};
pub use query::QueryParams;
