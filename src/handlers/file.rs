//! File handler with split policies
//!
//! Output files live directly under one directory and are named after the
//! split key: `default.log`, `<LEVEL>.log` or `<YYYY-MM-DD>.log`. Files are
//! opened lazily in append mode and kept open until they are rotated out or
//! the handler is dropped.

use crate::core::{timestamp, LogEntry, LogHandler, LoggerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Directory used when an empty path is configured, relative to the working
/// directory.
pub const DEFAULT_DIRECTORY: &str = "log";

/// Stream key for the single-file and day-split policies.
const DEFAULT_KEY: &str = "default";

/// How output is partitioned across files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitPolicy {
    /// Everything goes to `default.log`.
    #[default]
    #[serde(rename = "default")]
    Default,
    /// One file per level: `DEBUG.log`, `INFO.log`, ...
    #[serde(rename = "level")]
    ByLevel,
    /// One file per local calendar day: `2024-01-31.log`.
    #[serde(rename = "day")]
    ByDay,
}

#[derive(Debug, Default)]
struct StreamTable {
    streams: HashMap<String, File>,
    /// Day of the open `default` stream under [`SplitPolicy::ByDay`].
    day_label: Option<String>,
    directory_ready: bool,
}

/// Appends entries to split log files.
///
/// Lookup, rotation and the write itself happen under one lock, so there is
/// never more than one open stream per split key and lines never interleave.
///
/// Day rotation is lazy and keyed on the entry's creation time: the first
/// entry stamped after midnight closes the previous day's file and opens the
/// new one.
///
/// # Example
///
/// ```no_run
/// use fanout_logger::handlers::{FileHandler, SplitPolicy};
///
/// let handler = FileHandler::new("/var/log/app", SplitPolicy::ByDay).unwrap();
/// ```
#[derive(Debug)]
pub struct FileHandler {
    directory: PathBuf,
    split: SplitPolicy,
    table: Mutex<StreamTable>,
}

impl FileHandler {
    /// Create a handler writing under `directory`.
    ///
    /// An empty path means `<current working directory>/log`. The directory
    /// is created on first write.
    ///
    /// # Errors
    ///
    /// Fails only when an empty path is given and the working directory
    /// cannot be determined.
    pub fn new(directory: impl AsRef<Path>, split: SplitPolicy) -> Result<Self> {
        let directory = directory.as_ref();
        let directory = if directory.as_os_str().is_empty() {
            std::env::current_dir()
                .map_err(|e| {
                    LoggerError::io_operation(
                        "resolving log directory",
                        "cannot read the current working directory",
                        e,
                    )
                })?
                .join(DEFAULT_DIRECTORY)
        } else {
            directory.to_path_buf()
        };

        Ok(Self {
            directory,
            split,
            table: Mutex::new(StreamTable::default()),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn split(&self) -> SplitPolicy {
        self.split
    }

    /// Name of the file `entry` is written to.
    pub fn file_name(&self, entry: &LogEntry) -> String {
        match self.split {
            SplitPolicy::Default => format!("{}.log", DEFAULT_KEY),
            SplitPolicy::ByLevel => format!("{}.log", entry.level.to_str()),
            SplitPolicy::ByDay => format!("{}.log", timestamp::day_label(entry.created)),
        }
    }

    /// Full path of the file `entry` is written to.
    pub fn path_for(&self, entry: &LogEntry) -> PathBuf {
        self.directory.join(self.file_name(entry))
    }

    /// Number of files currently held open.
    pub async fn open_streams(&self) -> usize {
        self.table.lock().await.streams.len()
    }

    /// Day label of the open stream under [`SplitPolicy::ByDay`].
    pub async fn current_day_label(&self) -> Option<String> {
        self.table.lock().await.day_label.clone()
    }

    fn stream_key(&self, entry: &LogEntry) -> &'static str {
        match self.split {
            SplitPolicy::Default | SplitPolicy::ByDay => DEFAULT_KEY,
            SplitPolicy::ByLevel => entry.level.to_str(),
        }
    }

    /// Open `path` for appending. A directory removed since the first write
    /// (log cleanup) is recreated once before giving up.
    async fn open(&self, table: &mut StreamTable, path: &Path) -> Result<File> {
        let opened = match open_append(path).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                table.directory_ready = false;
                self.ensure_directory(table).await?;
                open_append(path).await
            }
            opened => opened,
        };
        opened.map_err(|e| {
            LoggerError::file_handler(path.display().to_string(), format!("Failed to open: {}", e))
        })
    }

    async fn ensure_directory(&self, table: &mut StreamTable) -> Result<()> {
        if table.directory_ready {
            return Ok(());
        }
        fs::create_dir_all(&self.directory).await.map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", self.directory.display()),
                e,
            )
        })?;
        table.directory_ready = true;
        Ok(())
    }

    /// Close yesterday's stream and open today's when the entry's day differs
    /// from the open one.
    async fn rotate_day(&self, table: &mut StreamTable, entry: &LogEntry) -> Result<()> {
        let label = timestamp::day_label(entry.created);
        if table.day_label.as_deref() == Some(label.as_str()) {
            return Ok(());
        }

        // Every write is flushed, so dropping the old stream closes it cleanly.
        drop(table.streams.remove(DEFAULT_KEY));

        let file = self.open(table, &self.path_for(entry)).await?;
        table.streams.insert(DEFAULT_KEY.to_string(), file);
        table.day_label = Some(label);
        Ok(())
    }
}

async fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path).await
}

#[async_trait]
impl LogHandler for FileHandler {
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let mut line = entry.format_line();
        line.push('\n');

        let mut table = self.table.lock().await;
        self.ensure_directory(&mut table).await?;
        if self.split == SplitPolicy::ByDay {
            self.rotate_day(&mut table, entry).await?;
        }

        let key = self.stream_key(entry);
        if !table.streams.contains_key(key) {
            let file = self.open(&mut table, &self.path_for(entry)).await?;
            table.streams.insert(key.to_string(), file);
        }
        let path = self.path_for(entry);
        let file = table
            .streams
            .get_mut(key)
            .ok_or_else(|| LoggerError::file_handler(path.display().to_string(), "stream not open"))?;

        file.write_all(line.as_bytes()).await.map_err(|e| {
            LoggerError::io_operation("writing log file", path.display().to_string(), e)
        })?;
        file.flush().await.map_err(|e| {
            LoggerError::io_operation("flushing log file", path.display().to_string(), e)
        })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}
