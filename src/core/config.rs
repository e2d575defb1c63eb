//! Declarative logger configuration
//!
//! Mirrors the builder for hosts that keep logger settings in a config file.
//! Every field has a default, so an empty document yields the same logger as
//! [`Logger::new`](super::logger::Logger::new).
//!
//! ```
//! use fanout_logger::core::LoggerConfig;
//! use fanout_logger::{LogLevel, SplitPolicy};
//!
//! let config = LoggerConfig::from_json_str(
//!     r#"{ "level": "INFO", "file": { "directory": "/var/log/app", "split": "day" } }"#,
//! ).unwrap();
//!
//! assert_eq!(config.level, LogLevel::Info);
//! assert_eq!(config.file.unwrap().split, SplitPolicy::ByDay);
//! ```

use super::entry_pool::DEFAULT_POOL_CAPACITY;
use super::error::Result;
use super::log_level::LogLevel;
use super::logger::{LoggerBuilder, DEFAULT_QUEUE_CAPACITY};
use crate::handlers::{FileHandler, SplitPolicy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub queue_capacity: usize,
    pub pool_capacity: usize,
    pub max_concurrent_deliveries: Option<usize>,
    /// Adds a [`FileHandler`] when present.
    pub file: Option<FileConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            max_concurrent_deliveries: None,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Empty means `<cwd>/log`.
    pub directory: String,
    pub split: SplitPolicy,
}

impl LoggerConfig {
    /// Parse a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonError`](super::error::LoggerError::JsonError)
    /// for malformed documents or unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Turn the configuration into a builder, creating the file handler if
    /// one is configured.
    ///
    /// # Errors
    ///
    /// Fails when the file handler's directory cannot be resolved.
    pub fn builder(&self) -> Result<LoggerBuilder> {
        let mut builder = LoggerBuilder::new()
            .level(self.level)
            .queue_capacity(self.queue_capacity)
            .pool_capacity(self.pool_capacity);

        if let Some(limit) = self.max_concurrent_deliveries {
            builder = builder.max_concurrent_deliveries(limit);
        }
        if let Some(file) = &self.file {
            let handler = FileHandler::new(&file.directory, file.split)?;
            builder = builder.handler(Arc::new(handler));
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = LoggerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.queue_capacity, 1000);
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn test_full_document() {
        let config = LoggerConfig::from_json_str(
            r#"{
                "level": "warn",
                "queue_capacity": 64,
                "pool_capacity": 16,
                "max_concurrent_deliveries": 8,
                "file": { "directory": "logs", "split": "level" }
            }"#,
        );
        // Level names are upper-case on the wire.
        assert!(config.is_err());

        let config = LoggerConfig::from_json_str(
            r#"{
                "level": "WARN",
                "queue_capacity": 64,
                "pool_capacity": 16,
                "max_concurrent_deliveries": 8,
                "file": { "directory": "logs", "split": "level" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.max_concurrent_deliveries, Some(8));
        assert_eq!(
            config.file,
            Some(FileConfig {
                directory: "logs".to_string(),
                split: SplitPolicy::ByLevel,
            })
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(LoggerConfig::from_json_str(r#"{ "queue_size": 10 }"#).is_err());
    }
}
