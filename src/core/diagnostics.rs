//! Diagnostic fallback channel
//!
//! Last-resort, human-readable output. The dispatch worker writes entries
//! here when no regular handler is registered, and every internal failure
//! (encoding, handler errors, handler panics) is reported here. Lines use the
//! same `LEVEL YYYY-MM-DD HH:MM:SS message` layout as file output.

use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp;
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Destination for diagnostic lines.
pub trait DiagnosticSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes diagnostics to standard output.
///
/// Write errors (a closed pipe, a full disk) are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let _ = writeln!(std::io::stdout().lock(), "{}", line);
    }
}

/// Keeps diagnostic lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Returns `true` if any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// Cloneable handle on the configured sink.
#[derive(Clone)]
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticSink>,
}

impl Diagnostics {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }

    /// Write an entry that had nowhere else to go.
    pub fn write_entry(&self, entry: &LogEntry) {
        self.emit(&entry.format_line());
    }

    /// Report an internal pipeline event, stamped with the current time.
    pub fn report(&self, level: LogLevel, message: impl fmt::Display) {
        let line = format!(
            "{} {} logger: {}",
            level.to_str(),
            timestamp::format_display(timestamp::now_secs()),
            message
        );
        self.emit(&line);
    }

    /// Hand a line to the sink. A panicking sink loses the line and nothing
    /// else: callers are emitters and the dispatch worker.
    fn emit(&self, line: &str) {
        let _ = panic::catch_unwind(AssertUnwindSafe(|| self.sink.write_line(line)));
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics").finish_non_exhaustive()
    }
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_entry_uses_line_format() {
        let sink = MemorySink::new();
        let diagnostics = Diagnostics::new(Arc::new(sink.clone()));
        let entry = LogEntry::at(LogLevel::Info, 0, "no handlers");

        diagnostics.write_entry(&entry);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], entry.format_line());
    }

    #[test]
    fn test_report_prefix() {
        let sink = MemorySink::new();
        let diagnostics = Diagnostics::new(Arc::new(sink.clone()));

        diagnostics.report(LogLevel::Error, "handler 'file' failed: disk full");

        let line = &sink.lines()[0];
        assert!(line.starts_with("ERROR "));
        assert!(line.ends_with(" logger: handler 'file' failed: disk full"));
    }

    struct PanickingSink;

    impl DiagnosticSink for PanickingSink {
        fn write_line(&self, _line: &str) {
            panic!("sink closed");
        }
    }

    #[test]
    fn test_panicking_sink_is_contained() {
        let diagnostics = Diagnostics::new(Arc::new(PanickingSink));

        diagnostics.write_entry(&LogEntry::at(LogLevel::Warn, 0, "dropped"));
        diagnostics.report(LogLevel::Error, "also dropped");
    }

    #[test]
    fn test_stdout_sink_never_panics() {
        StdoutSink.write_line("stdout sink line");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(payload.as_ref()), "owned boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u32);
        assert_eq!(panic_message(payload.as_ref()), "Unknown panic");
    }
}
