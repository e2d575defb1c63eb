//! In-memory handler
//!
//! Collects every entry it receives. Useful in tests and for hosts that want
//! to inspect recent output.

use crate::core::{LogEntry, LogHandler, NoticeHandler, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records received entries. Clones share the same buffer.
///
/// Implements both [`LogHandler`] and [`NoticeHandler`], so one instance can
/// watch either path.
#[derive(Debug, Clone)]
pub struct MemoryHandler {
    name: String,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the received entries, in arrival order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn record(&self, entry: &LogEntry) {
        self.entries.lock().push(entry.clone());
    }
}

impl Default for MemoryHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogHandler for MemoryHandler {
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        self.record(entry);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl NoticeHandler for MemoryHandler {
    async fn notice(&self, entry: &LogEntry) -> Result<()> {
        self.record(entry);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
