//! Closure-backed handler

use crate::core::{LogEntry, LogHandler, NoticeHandler, Result};
use async_trait::async_trait;

/// Adapts a closure into a handler.
///
/// The closure runs on the delivery task, so it should not block for long.
///
/// ```
/// use fanout_logger::handlers::CallbackHandler;
///
/// let alerts = CallbackHandler::new("pager", |entry| {
///     eprintln!("ALERT: {}", entry.message);
///     Ok(())
/// });
/// assert_eq!(alerts.name(), "pager");
/// ```
pub struct CallbackHandler<F> {
    name: String,
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(&LogEntry) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<F> LogHandler for CallbackHandler<F>
where
    F: Fn(&LogEntry) -> Result<()> + Send + Sync,
{
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        (self.callback)(entry)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<F> NoticeHandler for CallbackHandler<F>
where
    F: Fn(&LogEntry) -> Result<()> + Send + Sync,
{
    async fn notice(&self, entry: &LogEntry) -> Result<()> {
        (self.callback)(entry)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, LoggerError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_invokes_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = CallbackHandler::new("count", move |_entry: &LogEntry| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        handler.write(&LogEntry::new(LogLevel::Info, "a")).await.unwrap();
        handler.notice(&LogEntry::new(LogLevel::Info, "b")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_propagates_error() {
        let handler = CallbackHandler::new("broken", |_entry: &LogEntry| {
            Err(LoggerError::handler("broken", "unavailable"))
        });
        let result = handler.write(&LogEntry::new(LogLevel::Warn, "x")).await;
        assert!(result.is_err());
    }
}
