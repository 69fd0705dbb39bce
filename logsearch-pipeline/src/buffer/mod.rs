//! Ingest buffer for raw events awaiting flush.
//!
//! Request handlers append through the [`EventBuffer`] trait; the flusher
//! drains through it. The trait seam lets tests drive a flush
//! deterministically and leaves room for a bounded variant later.

use std::sync::Mutex;

use serde_json::Value;

/// Thread-safe accumulator of raw events awaiting flush.
///
/// Implementations must guarantee that every appended event lands in
/// exactly one drained batch: an event appended concurrently with a drain
/// appears either in the returned batch or in the next one, never both,
/// never neither.
pub trait EventBuffer: Send + Sync {
    /// Add one raw event to the pending set.
    fn append(&self, event: Value);

    /// Atomically take the full pending set, leaving the buffer empty.
    fn drain_and_reset(&self) -> Vec<Value>;
}

/// In-memory buffer guarded by a single mutex.
///
/// Both operations hold the lock only for the push or the list swap; no
/// I/O ever happens under it, so appends never wait on a flush in progress
/// beyond that critical section.
#[derive(Debug, Default)]
pub struct InMemoryBuffer {
    pending: Mutex<Vec<Value>>,
}

impl InMemoryBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventBuffer for InMemoryBuffer {
    fn append(&self, event: Value) {
        // A poisoned lock cannot leave the Vec inconsistent; keep serving.
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    fn drain_and_reset(&self) -> Vec<Value> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(|e| e.into_inner()))
    }
}
