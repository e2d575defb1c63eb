//! Handler capabilities
//!
//! Regular handlers receive every accepted entry. Notice handlers receive a
//! separate copy of entries flagged as notices. Each delivery runs in its own
//! task, so implementations take `&self` and must be safe to call
//! concurrently.

use super::{error::Result, log_entry::LogEntry};
use async_trait::async_trait;

/// Output destination for log entries.
///
/// # Example
///
/// ```no_run
/// use fanout_logger::core::{LogEntry, LogHandler, Result};
/// use async_trait::async_trait;
///
/// struct StdoutHandler;
///
/// #[async_trait]
/// impl LogHandler for StdoutHandler {
///     async fn write(&self, entry: &LogEntry) -> Result<()> {
///         println!("{}", entry.format_line());
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "stdout"
///     }
/// }
/// ```
#[async_trait]
pub trait LogHandler: Send + Sync {
    /// Write one entry.
    async fn write(&self, entry: &LogEntry) -> Result<()>;

    /// Handler name used in diagnostics.
    fn name(&self) -> &str;
}

/// Alerting side channel for entries flagged as notices.
#[async_trait]
pub trait NoticeHandler: Send + Sync {
    /// Deliver one notice. `entry` is a copy owned by the notice path.
    async fn notice(&self, entry: &LogEntry) -> Result<()>;

    /// Handler name used in diagnostics.
    fn name(&self) -> &str;
}
