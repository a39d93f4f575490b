//! Event log for list operations.
//!
//! Commands report what happened through an [`EventSink`] handed to them by
//! `main`; only [`FileLog`] talks to the `log` facade. The backing file is
//! `todo.log` in the managed directory, appended to, one line per event:
//!
//! ```text
//! 2025-08-01 17:00:30 - INFO - groceries created successfully
//! ```

use crate::types::TodoError;
use flexi_logger::{DeferredNow, FileSpec, Logger, LoggerHandle, WriteMode};
use log::{Level, Record};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub const LOG_FILE_BASENAME: &str = "todo";
const LOG_FILE_SUFFIX: &str = "log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub trait EventSink {
    fn record(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }
}

/// Owns the running file logger; events are dropped once this is gone.
pub struct FileLog {
    _handle: LoggerHandle,
}

impl FileLog {
    pub fn start(dir: &Path) -> Result<Self, TodoError> {
        fs::create_dir_all(dir)?;

        let handle = Logger::try_with_str("info")?
            .log_to_file(
                FileSpec::default()
                    .directory(dir)
                    .basename(LOG_FILE_BASENAME)
                    .suffix(LOG_FILE_SUFFIX)
                    .suppress_timestamp(),
            )
            .append()
            .format_for_files(line_format)
            .write_mode(WriteMode::Direct)
            .start()?;

        Ok(FileLog { _handle: handle })
    }
}

impl EventSink for FileLog {
    fn record(&self, level: Level, message: &str) {
        log::log!(level, "{message}");
    }
}

/// Used when the log file could not be opened.
pub struct NullLog;

impl EventSink for NullLog {
    fn record(&self, _level: Level, _message: &str) {}
}

pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn line_format(w: &mut dyn Write, now: &mut DeferredNow, record: &Record) -> io::Result<()> {
    write!(
        w,
        "{} - {} - {}",
        now.format(TIMESTAMP_FORMAT),
        level_name(record.level()),
        record.args()
    )
}
