//! Processor module for the logsearch pipeline.
//!
//! Transforms raw audit events into indexable documents.

mod record_transformer;

pub use record_transformer::RecordTransformer;
