//! Core logger types and traits

pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod encoder;
pub mod entry_pool;
pub mod error;
pub mod handler;
pub mod handler_set;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod timestamp;

pub use config::{FileConfig, LoggerConfig};
pub use diagnostics::{DiagnosticSink, Diagnostics, MemorySink, StdoutSink};
pub use dispatch::WorkerState;
pub use encoder::{encode, LogFields};
pub use entry_pool::{EntryPool, PooledEntry, DEFAULT_POOL_CAPACITY};
pub use error::{LoggerError, Result};
pub use handler::{LogHandler, NoticeHandler};
pub use handler_set::HandlerSet;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT};
pub use message::IntoMessage;
pub use metrics::LoggerMetrics;
