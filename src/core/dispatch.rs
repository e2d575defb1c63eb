//! Dispatch worker
//!
//! A single task per logger drains the queue and fans each entry out, one
//! spawned task per handler. Faults in a delivery (errors and panics alike)
//! stay inside that delivery and are reported to the diagnostic channel.

use super::{
    diagnostics::{panic_message, Diagnostics},
    entry_pool::{EntryPool, PooledEntry},
    error::Result,
    handler::{LogHandler, NoticeHandler},
    handler_set::HandlerSet,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Lifecycle of the dispatch worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    /// Dequeuing and dispatching entries.
    Running = 0,
    /// Cancellation observed; discarding whatever is still queued.
    Exiting = 1,
    /// The worker task has returned.
    Stopped = 2,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerState::Running => write!(f, "Running"),
            WorkerState::Exiting => write!(f, "Exiting"),
            WorkerState::Stopped => write!(f, "Stopped"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: WorkerState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn get(&self) -> WorkerState {
        match self.0.load(Ordering::Acquire) {
            0 => WorkerState::Running,
            1 => WorkerState::Exiting,
            _ => WorkerState::Stopped,
        }
    }

    fn set(&self, state: WorkerState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

pub(crate) struct DispatchWorker {
    pub(crate) receiver: mpsc::Receiver<PooledEntry>,
    pub(crate) handlers: Arc<HandlerSet>,
    pub(crate) pool: Arc<EntryPool>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) metrics: Arc<LoggerMetrics>,
    pub(crate) deliveries: TaskTracker,
    pub(crate) limiter: Option<Arc<Semaphore>>,
    pub(crate) shutdown: CancellationToken,
    pub(crate) state: Arc<StateCell>,
}

/// Marks the worker `Stopped` when `run` returns or unwinds.
struct StoppedOnDrop(Arc<StateCell>);

impl Drop for StoppedOnDrop {
    fn drop(&mut self) {
        self.0.set(WorkerState::Stopped);
    }
}

impl DispatchWorker {
    pub(crate) async fn run(mut self) {
        let _stopped = StoppedOnDrop(Arc::clone(&self.state));
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                next = self.receiver.recv() => match next {
                    Some(entry) => {
                        if !self.dispatch(entry).await {
                            break;
                        }
                    }
                    // Every sender is gone: the logger was dropped.
                    None => break,
                },
            }
        }

        self.state.set(WorkerState::Exiting);
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
    }

    /// Fan one entry out. Returns `false` if shutdown was requested while
    /// waiting for a delivery slot.
    async fn dispatch(&self, entry: PooledEntry) -> bool {
        let entry = Arc::new(entry);

        if entry.is_notice {
            let notice_handlers = self.handlers.notice_handlers();
            if !notice_handlers.is_empty() {
                let copy = Arc::new(self.pool.duplicate(&entry));
                for handler in notice_handlers.iter() {
                    let Some(permit) = self.delivery_slot().await else {
                        return false;
                    };
                    self.spawn_notice(Arc::clone(handler), Arc::clone(&copy), permit);
                }
            }
        }

        let handlers = self.handlers.handlers();
        if handlers.is_empty() {
            self.diagnostics.write_entry(&entry);
            self.metrics.record_fallback_write();
            return true;
        }

        for handler in handlers.iter() {
            let Some(permit) = self.delivery_slot().await else {
                return false;
            };
            self.spawn_write(Arc::clone(handler), Arc::clone(&entry), permit);
        }
        true
    }

    /// Wait for a concurrency permit when a cap is configured.
    ///
    /// The outer `None` means shutdown was requested while waiting.
    async fn delivery_slot(&self) -> Option<Option<OwnedSemaphorePermit>> {
        let Some(limiter) = &self.limiter else {
            return Some(None);
        };
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            permit = Arc::clone(limiter).acquire_owned() => permit.ok().map(Some),
        }
    }

    fn spawn_write(
        &self,
        handler: Arc<dyn LogHandler>,
        entry: Arc<PooledEntry>,
        permit: Option<OwnedSemaphorePermit>,
    ) {
        let diagnostics = self.diagnostics.clone();
        let metrics = Arc::clone(&self.metrics);
        self.deliveries.spawn(async move {
            let outcome = AssertUnwindSafe(handler.write(&entry)).catch_unwind().await;
            settle(&diagnostics, &metrics, "handler", handler.name(), outcome);
            drop(permit);
        });
    }

    fn spawn_notice(
        &self,
        handler: Arc<dyn NoticeHandler>,
        entry: Arc<PooledEntry>,
        permit: Option<OwnedSemaphorePermit>,
    ) {
        let diagnostics = self.diagnostics.clone();
        let metrics = Arc::clone(&self.metrics);
        self.deliveries.spawn(async move {
            let outcome = AssertUnwindSafe(handler.notice(&entry)).catch_unwind().await;
            settle(&diagnostics, &metrics, "notice handler", handler.name(), outcome);
            drop(permit);
        });
    }
}

fn settle(
    diagnostics: &Diagnostics,
    metrics: &LoggerMetrics,
    kind: &str,
    name: &str,
    outcome: std::thread::Result<Result<()>>,
) {
    match outcome {
        Ok(Ok(())) => {
            metrics.record_delivered();
        }
        Ok(Err(e)) => {
            metrics.record_delivery_failure();
            diagnostics.report(LogLevel::Error, format_args!("{} '{}' failed: {}", kind, name, e));
        }
        Err(panic) => {
            metrics.record_delivery_failure();
            diagnostics.report(
                LogLevel::Error,
                format_args!(
                    "{} '{}' panicked: {}",
                    kind,
                    name,
                    panic_message(panic.as_ref())
                ),
            );
        }
    }
}
