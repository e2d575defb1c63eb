//! Reusable entry pool
//!
//! Emit calls acquire an entry from the pool instead of allocating one. The
//! entry goes back to the pool when its [`PooledEntry`] guard is dropped,
//! which for dispatched entries means after the last handler holding the
//! shared `Arc` has finished.

use super::log_entry::LogEntry;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Default number of idle entries retained for reuse.
pub const DEFAULT_POOL_CAPACITY: usize = 1000;

/// Bounded free list of reset entries.
///
/// Acquire never blocks: an empty pool hands out a fresh entry. Release
/// never blocks either: a full pool lets the entry drop.
pub struct EntryPool {
    free_tx: Sender<LogEntry>,
    free_rx: Receiver<LogEntry>,
}

impl EntryPool {
    #[must_use]
    pub fn new(capacity: usize) -> Arc<Self> {
        let (free_tx, free_rx) = bounded(capacity);
        Arc::new(Self { free_tx, free_rx })
    }

    /// Take a zeroed entry out of the pool.
    pub fn acquire(self: &Arc<Self>) -> PooledEntry {
        let entry = self.free_rx.try_recv().unwrap_or_default();
        PooledEntry {
            entry,
            pool: Arc::clone(self),
        }
    }

    /// Acquire an entry holding a copy of `source`.
    pub fn duplicate(self: &Arc<Self>, source: &LogEntry) -> PooledEntry {
        let mut copy = self.acquire();
        copy.copy_from(source);
        copy
    }

    /// Number of idle entries ready for reuse.
    pub fn available(&self) -> usize {
        self.free_rx.len()
    }

    fn release(&self, mut entry: LogEntry) {
        entry.reset();
        let _ = self.free_tx.try_send(entry);
    }
}

impl fmt::Debug for EntryPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPool")
            .field("available", &self.available())
            .field("capacity", &self.free_tx.capacity())
            .finish()
    }
}

/// An entry on loan from an [`EntryPool`].
pub struct PooledEntry {
    entry: LogEntry,
    pool: Arc<EntryPool>,
}

impl Deref for PooledEntry {
    type Target = LogEntry;

    fn deref(&self) -> &LogEntry {
        &self.entry
    }
}

impl DerefMut for PooledEntry {
    fn deref_mut(&mut self) -> &mut LogEntry {
        &mut self.entry
    }
}

impl fmt::Debug for PooledEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entry.fmt(f)
    }
}

impl Drop for PooledEntry {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.entry));
    }
}
