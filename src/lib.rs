//! # Fanout Logger
//!
//! An asynchronous in-process logging pipeline. Callers emit entries without
//! blocking; a single background worker fans each entry out to every
//! registered handler, and entries flagged as notices additionally to a
//! separate set of notice handlers.
//!
//! ## Features
//!
//! - **Non-blocking emits**: bounded queue, new entries dropped when full
//! - **Fault isolation**: a failing or panicking handler never affects others
//! - **Split log files**: single file, one file per level, or one per day
//! - **JSON payloads**: any `Serialize` value logged as compact JSON
//!
//! ```no_run
//! use fanout_logger::prelude::*;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<()> {
//! let cancel = CancellationToken::new();
//! let logger = Logger::new(&cancel)?;
//! logger.add_handler(Arc::new(FileHandler::new("logs", SplitPolicy::ByLevel)?));
//!
//! logger.info("ready");
//! logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT).await;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::handlers::ConsoleHandler;
    pub use crate::handlers::{CallbackHandler, FileHandler, MemoryHandler, SplitPolicy};
    pub use crate::core::{
        DiagnosticSink, IntoMessage, LogEntry, LogFields, LogHandler, LogLevel, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, MemorySink, NoticeHandler,
        Result, WorkerState, DEFAULT_POOL_CAPACITY, DEFAULT_QUEUE_CAPACITY,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

#[cfg(feature = "console")]
pub use crate::handlers::ConsoleHandler;
pub use crate::handlers::{CallbackHandler, FileHandler, MemoryHandler, SplitPolicy};
pub use crate::core::{
    DiagnosticSink, IntoMessage, LogEntry, LogFields, LogHandler, LogLevel, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, MemorySink, NoticeHandler, Result,
    WorkerState, DEFAULT_POOL_CAPACITY, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
