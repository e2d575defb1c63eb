//! Console handler

use crate::core::{LogEntry, LogHandler, LogLevel, Result};
use async_trait::async_trait;
use colored::Colorize;

/// Prints entries to the terminal. `ERROR` goes to stderr, everything else to
/// stdout.
pub struct ConsoleHandler {
    use_colors: bool,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn format_line(&self, entry: &LogEntry) -> String {
        if !self.use_colors {
            return entry.format_line();
        }
        let line = entry.format_line();
        // The level name is always the first token of the plain line.
        let rest = line
            .strip_prefix(entry.level.to_str())
            .unwrap_or(line.as_str());
        format!("{}{}", entry.level.to_str().color(entry.level.color_code()), rest)
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogHandler for ConsoleHandler {
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let output = self.format_line(entry);
        match entry.level {
            LogLevel::Error => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_format_matches_entry_line() {
        let handler = ConsoleHandler::with_colors(false);
        let entry = LogEntry::at(LogLevel::Info, 0, "plain");
        assert_eq!(handler.format_line(&entry), entry.format_line());
    }

    #[test]
    fn test_colored_format_keeps_message() {
        let handler = ConsoleHandler::new();
        let entry = LogEntry::at(LogLevel::Warn, 0, "careful");
        let line = handler.format_line(&entry);
        assert!(line.contains("WARN"));
        assert!(line.ends_with(" careful"));
    }

    #[tokio::test]
    async fn test_write_succeeds() {
        let handler = ConsoleHandler::with_colors(false);
        handler
            .write(&LogEntry::new(LogLevel::Error, "to stderr"))
            .await
            .unwrap();
    }
}
