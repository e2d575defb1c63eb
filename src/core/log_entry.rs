//! Log entry structure

use super::log_level::LogLevel;
use super::timestamp;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One log record.
///
/// The message is always fully formed by the time an entry is queued:
/// plain parts are joined and sanitized, structured payloads are encoded.
/// Nothing downstream rewrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Creation time in unix seconds.
    pub created: i64,
    pub message: String,
    pub is_notice: bool,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    ///
    /// The message is sanitized: newlines, carriage returns and tabs are
    /// written as escape sequences so one entry is always one output line.
    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self::at(level, timestamp::now_secs(), message)
    }

    /// Create an entry with an explicit creation time.
    pub fn at(level: LogLevel, created: i64, message: impl AsRef<str>) -> Self {
        let mut entry = Self {
            level,
            created,
            message: String::new(),
            is_notice: false,
        };
        push_sanitized(&mut entry.message, message.as_ref());
        entry
    }

    /// Mark the entry as a notice.
    #[must_use]
    pub fn with_notice(mut self, is_notice: bool) -> Self {
        self.is_notice = is_notice;
        self
    }

    /// Return every field to its zero value.
    ///
    /// The message buffer keeps its allocation for reuse.
    pub fn reset(&mut self) {
        self.level = LogLevel::default();
        self.created = 0;
        self.message.clear();
        self.is_notice = false;
    }

    /// Overwrite this entry with the fields of `other`, reusing the buffer.
    pub fn copy_from(&mut self, other: &LogEntry) {
        self.level = other.level;
        self.created = other.created;
        self.message.clone_from(&other.message);
        self.is_notice = other.is_notice;
    }

    pub fn created_local(&self) -> DateTime<Local> {
        timestamp::to_local(self.created)
    }

    /// `LEVEL YYYY-MM-DD HH:MM:SS MESSAGE`, without a trailing newline.
    pub fn format_line(&self) -> String {
        format!(
            "{} {} {}",
            self.level.to_str(),
            timestamp::format_display(self.created),
            self.message
        )
    }
}

/// Append `text` to `buf`, escaping line breaks and tabs to prevent log
/// injection.
pub(crate) fn push_sanitized(buf: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            _ => buf.push(ch),
        }
    }
}
