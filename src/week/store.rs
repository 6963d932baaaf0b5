//! Persistence adapter: one opaque blob under one localStorage key.
//!
//! The WASM worker cannot touch `localStorage` itself, so writes land in an
//! outbox that the worker drains (via `take_persist`) after each request and
//! forwards to the main thread. Restores flow the other way on page load.

/// localStorage key holding the serialized progress record.
pub const STORAGE_KEY: &str = "valentineWeekState";

/// Get/set a single serialized progress record.
pub trait ProgressStore {
    /// The last blob known to be in storage, if any.
    fn load(&self) -> Option<String>;
    /// Replace the stored blob.
    fn save(&mut self, blob: &str);
}

/// Store used inside the worker: remembers the current blob and queues the
/// latest write for the main thread.
#[derive(Debug, Clone, Default)]
pub struct OutboxStore {
    current: Option<String>,
    pending: Option<String>,
}

impl OutboxStore {
    /// Take the queued write, leaving the outbox empty. Only the most recent
    /// write survives; earlier ones are superseded.
    pub fn take_pending(&mut self) -> Option<String> {
        self.pending.take()
    }
}

impl ProgressStore for OutboxStore {
    fn load(&self) -> Option<String> {
        self.current.clone()
    }

    fn save(&mut self, blob: &str) {
        self.current = Some(blob.to_string());
        self.pending = Some(blob.to_string());
    }
}

/// In-memory store that keeps every write, for asserting write counts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub writes: Vec<String>,
    initial: Option<String>,
}

impl MemoryStore {
    pub fn with_blob(blob: &str) -> Self {
        Self {
            writes: Vec::new(),
            initial: Some(blob.to_string()),
        }
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.writes.last().cloned().or_else(|| self.initial.clone())
    }

    fn save(&mut self, blob: &str) {
        self.writes.push(blob.to_string());
    }
}
