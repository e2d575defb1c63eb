//! Main logger implementation

use super::{
    config::LoggerConfig,
    diagnostics::{DiagnosticSink, Diagnostics},
    dispatch::{DispatchWorker, StateCell, WorkerState},
    encoder,
    entry_pool::{EntryPool, PooledEntry, DEFAULT_POOL_CAPACITY},
    error::{LoggerError, Result},
    handler::{LogHandler, NoticeHandler},
    handler_set::HandlerSet,
    log_level::LogLevel,
    message::IntoMessage,
    metrics::LoggerMetrics,
    timestamp,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Default queue capacity. Entries beyond it are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default time [`Logger::shutdown`] callers are expected to allow.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Asynchronous fan-out logger.
///
/// Emit methods never block and never fail: entries below the configured
/// level are ignored, accepted entries are queued without waiting, and a full
/// queue drops the new entry. A background worker delivers each queued entry
/// to every registered handler, and entries flagged as notices additionally
/// to every notice handler.
///
/// # Example
///
/// ```no_run
/// use fanout_logger::prelude::*;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<()> {
/// let cancel = CancellationToken::new();
/// let logger = Logger::new(&cancel)?;
///
/// logger.info("service started");
/// logger.warn(["cache", "warming", "slow"]);
/// logger.error_json_notice(&LogFields::new().with("order", 42).with("status", "failed"));
///
/// cancel.cancel();
/// # Ok(())
/// # }
/// ```
pub struct Logger {
    min_level: RwLock<LogLevel>,
    sender: mpsc::Sender<PooledEntry>,
    handlers: Arc<HandlerSet>,
    pool: Arc<EntryPool>,
    metrics: Arc<LoggerMetrics>,
    diagnostics: Diagnostics,
    shutdown: CancellationToken,
    deliveries: TaskTracker,
    worker: Mutex<Option<JoinHandle<()>>>,
    state: Arc<StateCell>,
}

impl Logger {
    /// Start a logger with default settings: level DEBUG, queue capacity
    /// 1000, no handlers.
    ///
    /// The worker stops when `cancel` (or the logger's own child of it) is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Fails when called outside a tokio runtime.
    pub fn new(cancel: &CancellationToken) -> Result<Self> {
        Self::builder().build(cancel)
    }

    /// Start a logger described by `config`, including its file handler.
    ///
    /// # Errors
    ///
    /// Fails on invalid settings, an unusable log directory, or when no
    /// tokio runtime is available.
    pub fn from_config(config: &LoggerConfig, cancel: &CancellationToken) -> Result<Self> {
        config.builder()?.build(cancel)
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```no_run
    /// use fanout_logger::prelude::*;
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # fn run() -> Result<()> {
    /// let logger = Logger::builder()
    ///     .level(LogLevel::Info)
    ///     .queue_capacity(4096)
    ///     .build(&CancellationToken::new())?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn set_level(&self, level: LogLevel) {
        let mut min_level = self.min_level.write();
        *min_level = level;
    }

    pub fn level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Returns `true` if an entry at `level` would pass the filter.
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level.passes(*self.min_level.read())
    }

    /// Register a regular output handler.
    pub fn add_handler(&self, handler: Arc<dyn LogHandler>) {
        self.handlers.add_handler(handler);
    }

    /// Register a notice handler.
    pub fn add_notice_handler(&self, handler: Arc<dyn NoticeHandler>) {
        self.handlers.add_notice_handler(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.handler_count()
    }

    pub fn notice_handler_count(&self) -> usize {
        self.handlers.notice_handler_count()
    }

    /// Emit a plain-text entry.
    ///
    /// Multiple parts are joined with a single space.
    pub fn log(&self, level: LogLevel, notice: bool, message: impl IntoMessage) {
        if !self.admit(level) {
            return;
        }

        let mut entry = self.pool.acquire();
        entry.level = level;
        entry.created = timestamp::now_secs();
        entry.is_notice = notice;
        message.write_message(&mut entry.message);
        self.enqueue(entry);
    }

    /// Emit a structured entry, encoded as JSON.
    ///
    /// A payload that encodes to `null` or an empty object is ignored. An
    /// encoding failure is reported on the diagnostic channel and the entry
    /// is dropped.
    pub fn log_json<T: Serialize + ?Sized>(&self, level: LogLevel, notice: bool, fields: &T) {
        if !self.admit(level) {
            return;
        }

        let message = match encoder::encode(fields) {
            Ok(Some(message)) => message,
            Ok(None) => return,
            Err(e) => {
                self.metrics.record_encode_failure();
                self.diagnostics.report(
                    LogLevel::Error,
                    format_args!("failed to encode structured {} entry: {}", level, e),
                );
                return;
            }
        };

        let mut entry = self.pool.acquire();
        entry.level = level;
        entry.created = timestamp::now_secs();
        entry.is_notice = notice;
        entry.message.push_str(&message);
        self.enqueue(entry);
    }

    /// Level filter plus a cheap capacity check before any entry is built.
    fn admit(&self, level: LogLevel) -> bool {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return false;
        }
        if self.sender.capacity() == 0 {
            self.metrics.record_dropped();
            return false;
        }
        true
    }

    fn enqueue(&self, entry: PooledEntry) {
        match self.sender.try_send(entry) {
            Ok(()) => {
                self.metrics.record_accepted();
            }
            // Dropped entries go straight back to the pool.
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                self.metrics.record_dropped();
            }
        }
    }

    #[inline]
    pub fn debug(&self, message: impl IntoMessage) {
        self.log(LogLevel::Debug, false, message);
    }

    #[inline]
    pub fn info(&self, message: impl IntoMessage) {
        self.log(LogLevel::Info, false, message);
    }

    #[inline]
    pub fn warn(&self, message: impl IntoMessage) {
        self.log(LogLevel::Warn, false, message);
    }

    #[inline]
    pub fn error(&self, message: impl IntoMessage) {
        self.log(LogLevel::Error, false, message);
    }

    #[inline]
    pub fn debug_notice(&self, message: impl IntoMessage) {
        self.log(LogLevel::Debug, true, message);
    }

    #[inline]
    pub fn info_notice(&self, message: impl IntoMessage) {
        self.log(LogLevel::Info, true, message);
    }

    #[inline]
    pub fn warn_notice(&self, message: impl IntoMessage) {
        self.log(LogLevel::Warn, true, message);
    }

    #[inline]
    pub fn error_notice(&self, message: impl IntoMessage) {
        self.log(LogLevel::Error, true, message);
    }

    #[inline]
    pub fn debug_json<T: Serialize + ?Sized>(&self, fields: &T) {
        self.log_json(LogLevel::Debug, false, fields);
    }

    #[inline]
    pub fn info_json<T: Serialize + ?Sized>(&self, fields: &T) {
        self.log_json(LogLevel::Info, false, fields);
    }

    #[inline]
    pub fn warn_json<T: Serialize + ?Sized>(&self, fields: &T) {
        self.log_json(LogLevel::Warn, false, fields);
    }

    #[inline]
    pub fn error_json<T: Serialize + ?Sized>(&self, fields: &T) {
        self.log_json(LogLevel::Error, false, fields);
    }

    #[inline]
    pub fn debug_json_notice<T: Serialize + ?Sized>(&self, fields: &T) {
        self.log_json(LogLevel::Debug, true, fields);
    }

    #[inline]
    pub fn info_json_notice<T: Serialize + ?Sized>(&self, fields: &T) {
        self.log_json(LogLevel::Info, true, fields);
    }

    #[inline]
    pub fn warn_json_notice<T: Serialize + ?Sized>(&self, fields: &T) {
        self.log_json(LogLevel::Warn, true, fields);
    }

    #[inline]
    pub fn error_json_notice<T: Serialize + ?Sized>(&self, fields: &T) {
        self.log_json(LogLevel::Error, true, fields);
    }

    /// Get the logger metrics
    ///
    /// Queue saturation is silent on the diagnostic channel; watch
    /// `dropped_count` here instead.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// The pool entries are borrowed from.
    pub fn pool(&self) -> &EntryPool {
        &self.pool
    }

    pub fn worker_state(&self) -> WorkerState {
        self.state.get()
    }

    /// Stop the worker and wait, up to `timeout`, for it and for deliveries
    /// already in flight.
    ///
    /// Entries still queued are discarded. Returns `true` if everything
    /// finished in time.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.shutdown.cancel();
        let deadline = tokio::time::Instant::now() + timeout;

        let worker = self.worker.lock().take();
        if let Some(handle) = worker {
            match tokio::time::timeout_at(deadline, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.diagnostics.report(
                        LogLevel::Error,
                        format_args!("dispatch worker failed during shutdown: {}", e),
                    );
                    return false;
                }
                Err(_) => {
                    self.diagnostics.report(
                        LogLevel::Warn,
                        format_args!("dispatch worker did not stop within {:?}", timeout),
                    );
                    return false;
                }
            }
        }

        self.deliveries.close();
        if tokio::time::timeout_at(deadline, self.deliveries.wait()).await.is_err() {
            self.diagnostics.report(
                LogLevel::Warn,
                format_args!(
                    "{} deliveries still running after {:?}",
                    self.deliveries.len(),
                    timeout
                ),
            );
            return false;
        }

        true
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Cancels only this logger's child token, never the caller's.
        self.shutdown.cancel();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```no_run
/// use fanout_logger::prelude::*;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # fn run() -> Result<()> {
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .queue_capacity(1000)
///     .max_concurrent_deliveries(64)
///     .handler(Arc::new(ConsoleHandler::new()))
///     .build(&CancellationToken::new())?;
/// # Ok(())
/// # }
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    queue_capacity: usize,
    pool_capacity: usize,
    max_concurrent_deliveries: Option<usize>,
    handlers: Vec<Arc<dyn LogHandler>>,
    notice_handlers: Vec<Arc<dyn NoticeHandler>>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    runtime: Option<Handle>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: LogLevel::Debug,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            max_concurrent_deliveries: None,
            handlers: Vec::new(),
            notice_handlers: Vec::new(),
            diagnostics: None,
            runtime: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the queue capacity
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set how many idle entries the pool retains
    #[must_use = "builder methods return a new value"]
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Cap the number of handler deliveries running at once
    ///
    /// Without a cap every delivery gets its own task immediately. With a
    /// cap the worker waits for a free slot; producers are unaffected and the
    /// queue absorbs the backlog.
    #[must_use = "builder methods return a new value"]
    pub fn max_concurrent_deliveries(mut self, limit: usize) -> Self {
        self.max_concurrent_deliveries = Some(limit);
        self
    }

    /// Add a regular handler
    #[must_use = "builder methods return a new value"]
    pub fn handler(mut self, handler: Arc<dyn LogHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Add a notice handler
    #[must_use = "builder methods return a new value"]
    pub fn notice_handler(mut self, handler: Arc<dyn NoticeHandler>) -> Self {
        self.notice_handlers.push(handler);
        self
    }

    /// Replace the diagnostic sink (stdout by default)
    #[must_use = "builder methods return a new value"]
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Run the worker on `handle` instead of the current runtime
    #[must_use = "builder methods return a new value"]
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Build the Logger and start its dispatch worker
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] for a zero queue capacity
    /// or concurrency cap, or when no tokio runtime is available.
    pub fn build(self, cancel: &CancellationToken) -> Result<Logger> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "queue_capacity",
                "must be greater than zero",
            ));
        }
        if self.max_concurrent_deliveries == Some(0) {
            return Err(LoggerError::config(
                "max_concurrent_deliveries",
                "must be greater than zero",
            ));
        }

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|e| {
                LoggerError::config("runtime", format!("no tokio runtime available: {}", e))
            })?,
        };

        let handlers = Arc::new(HandlerSet::new());
        for handler in self.handlers {
            handlers.add_handler(handler);
        }
        for handler in self.notice_handlers {
            handlers.add_notice_handler(handler);
        }

        let diagnostics = self
            .diagnostics
            .map(Diagnostics::new)
            .unwrap_or_default();
        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        let pool = EntryPool::new(self.pool_capacity);
        let metrics = Arc::new(LoggerMetrics::new());
        let shutdown = cancel.child_token();
        let deliveries = TaskTracker::new();
        let state = Arc::new(StateCell::new(WorkerState::Running));

        let worker = DispatchWorker {
            receiver,
            handlers: Arc::clone(&handlers),
            pool: Arc::clone(&pool),
            diagnostics: diagnostics.clone(),
            metrics: Arc::clone(&metrics),
            deliveries: deliveries.clone(),
            limiter: self
                .max_concurrent_deliveries
                .map(|limit| Arc::new(Semaphore::new(limit))),
            shutdown: shutdown.clone(),
            state: Arc::clone(&state),
        };
        let handle = runtime.spawn(worker.run());

        Ok(Logger {
            min_level: RwLock::new(self.level),
            sender,
            handlers,
            pool,
            metrics,
            diagnostics,
            shutdown,
            deliveries,
            worker: Mutex::new(Some(handle)),
            state,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
