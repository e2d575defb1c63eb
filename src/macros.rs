//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```no_run
//! use fanout_logger::prelude::*;
//! use fanout_logger::{info, notice};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<()> {
//! let logger = Logger::new(&CancellationToken::new())?;
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Also delivered to notice handlers
//! notice!(logger, LogLevel::Error, "Disk {} is full", "/dev/sda1");
//! # Ok(())
//! # }
//! ```

/// Log a formatted message at `level`.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, false, format!($($arg)+))
    };
}

/// Log a formatted message at `level` and deliver it to notice handlers too.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, true, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Build a [`LogFields`](crate::LogFields) map for the `*_json` methods.
///
/// ```
/// use fanout_logger::fields;
///
/// let fields = fields! { "user" => "alice", "attempts" => 3 };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::LogFields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::LogFields::new()$(.with($key, $value))+
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger};
    use crate::handlers::MemoryHandler;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    async fn capture() -> (Logger, Arc<MemoryHandler>) {
        let memory = Arc::new(MemoryHandler::new());
        let logger = Logger::builder()
            .handler(memory.clone())
            .build(&CancellationToken::new())
            .unwrap();
        (logger, memory)
    }

    async fn wait_for_entries(memory: &MemoryHandler, count: usize) {
        for _ in 0..500 {
            if memory.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn test_log_macro() {
        let (logger, memory) = capture().await;
        log!(logger, LogLevel::Info, "Formatted: {}", 42);
        wait_for_entries(&memory, 1).await;
        assert_eq!(memory.messages(), ["Formatted: 42"]);
        assert_eq!(memory.entries()[0].level, LogLevel::Info);
    }

    #[tokio::test]
    async fn test_level_macros() {
        let (logger, memory) = capture().await;
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        wait_for_entries(&memory, 4).await;

        let mut levels: Vec<LogLevel> = memory.entries().iter().map(|e| e.level).collect();
        levels.sort();
        assert_eq!(levels, LogLevel::ALL);
    }

    #[tokio::test]
    async fn test_notice_macro_sets_flag() {
        let (logger, memory) = capture().await;
        notice!(logger, LogLevel::Warn, "disk {}% full", 91);
        wait_for_entries(&memory, 1).await;
        let entries = memory.entries();
        assert!(entries[0].is_notice);
        assert_eq!(entries[0].message, "disk 91% full");
    }

    #[test]
    fn test_fields_macro() {
        let fields = fields! { "a" => 1, "b" => "two" };
        assert_eq!(fields.get("a"), Some(&serde_json::json!(1)));
        assert_eq!(fields.get("b"), Some(&serde_json::json!("two")));
        assert!(fields!().is_empty());
    }
}
