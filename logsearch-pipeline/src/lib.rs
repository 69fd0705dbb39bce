//! # Logsearch Pipeline
//!
//! This crate provides the ingestion pipeline for the logsearch system.
//!
//! ## Architecture
//!
//! The pipeline follows the Buffer-Transformer-Flusher pattern:
//!
//! 1. **Buffer**: Request handlers append raw events to a shared buffer
//! 2. **Transformer**: Projects raw events into indexable documents
//! 3. **Flusher**: Periodically drains the buffer, commits the transformed
//!    batch to the index store, and archives the raw batch (plus any
//!    failed-commit subset) to the object store

pub mod archive_writer;
pub mod buffer;
pub mod errors;
pub mod flusher;
pub mod processor;

pub use archive_writer::ArchiveWriter;
pub use buffer::{EventBuffer, InMemoryBuffer};
pub use errors::PipelineError;
pub use flusher::{FlushConfig, FlushOutcome, Flusher};
pub use processor::RecordTransformer;
