//! Per-session log file owned by one executor instance
//!
//! Each executor opens exactly one file under `logs/cmd_runner_logs/` for its
//! lifetime. The file is reset to a short sentinel at the start of every
//! command, so after a crash it holds at most one command's worth of entries.
//! Entries are mirrored to the process-wide `tracing` subscriber.

use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::error::SessionLogError;
use crate::paths;

/// Content left in the file by [`SessionLog::reset`].
pub const RESET_SENTINEL: &str = "#\n#\n#\n#\n#\n";

/// `tracing` target for mirrored session entries.
pub const MIRROR_TARGET: &str = "cmdrunner::session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One session log line before it is timestamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
        }
    }

    /// `<YYYY-MM-DD HH:MM:SS,mmm> - <LEVEL> - <message>` without trailing newline.
    #[must_use]
    pub fn render(&self, at: &DateTime<Local>) -> String {
        format!(
            "{} - {} - {}",
            at.format("%Y-%m-%d %H:%M:%S,%3f"),
            self.level,
            self.message
        )
    }
}

/// Append-only session log with an explicit, idempotent close.
#[derive(Debug)]
pub struct SessionLog {
    path: PathBuf,
    file: Option<File>,
    mirror: bool,
}

impl SessionLog {
    /// Open a log named after the current local time under `work_dir`.
    ///
    /// Creates `<work_dir>/logs/cmd_runner_logs/` when missing. Failure here
    /// is fatal to the session.
    pub fn open(work_dir: &Path) -> Result<Self, SessionLogError> {
        Self::open_at(work_dir, &Local::now())
    }

    /// Like [`SessionLog::open`] with an explicit timestamp for the file name.
    pub fn open_at(work_dir: &Path, at: &DateTime<Local>) -> Result<Self, SessionLogError> {
        let dir = paths::session_log_dir(work_dir);
        fs::create_dir_all(&dir).map_err(|source| SessionLogError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(paths::session_log_file_name(at));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SessionLogError::Open {
                path: path.clone(),
                source,
            })?;

        let mut log = Self {
            path,
            file: Some(file),
            mirror: true,
        };
        let opened = format!("session started - log file: {}", log.path.display());
        log.record(&LogEntry::info(opened))?;
        Ok(log)
    }

    /// Enable or disable mirroring to `tracing`.
    #[must_use]
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Append one timestamped line. No-op once closed.
    pub fn record(&mut self, entry: &LogEntry) -> Result<(), SessionLogError> {
        let Some(file) = self.file.as_mut() else {
            debug!(level = %entry.level, "session log closed, entry dropped");
            return Ok(());
        };

        if self.mirror {
            mirror(entry);
        }

        let line = entry.render(&Local::now());
        writeln!(file, "{line}").map_err(|source| SessionLogError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Truncate the file down to [`RESET_SENTINEL`]. No-op once closed.
    pub fn reset(&mut self) -> Result<(), SessionLogError> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };

        // Append mode: after truncation the next write lands at offset 0
        file.set_len(0)
            .and_then(|()| file.write_all(RESET_SENTINEL.as_bytes()))
            .map_err(|source| SessionLogError::Write {
                path: self.path.clone(),
                source,
            })
    }

    /// Flush and release the handle. Safe to call any number of times.
    pub fn close(&mut self) {
        if let Some(mut file) = self.file.take() {
            if let Err(err) = file.flush().and_then(|()| file.sync_all()) {
                warn!(path = %self.path.display(), error = %err, "failed to flush session log on close");
            }
            debug!(path = %self.path.display(), "session log closed");
        }
    }
}

impl Drop for SessionLog {
    fn drop(&mut self) {
        self.close();
    }
}

fn mirror(entry: &LogEntry) {
    match entry.level {
        LogLevel::Info => info!(target: MIRROR_TARGET, "{}", entry.message),
        LogLevel::Warning => warn!(target: MIRROR_TARGET, "{}", entry.message),
        LogLevel::Error => error!(target: MIRROR_TARGET, "{}", entry.message),
    }
}
