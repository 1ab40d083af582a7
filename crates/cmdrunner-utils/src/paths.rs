//! On-disk layout under the working directory

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub const LOGS_DIR: &str = "logs";
pub const SESSION_LOGS_DIR: &str = "cmd_runner_logs";
pub const SESSION_LOG_PREFIX: &str = "cmd_runner_logs_";
pub const SESSION_LOG_EXTENSION: &str = "log";

/// Stem shared by the scratch script and its capture file.
pub const SCRATCH_STEM: &str = "tempCodeRunner";
pub const CAPTURE_EXTENSION: &str = "txt";

/// `<work_dir>/logs/cmd_runner_logs`
#[must_use]
pub fn session_log_dir(work_dir: &Path) -> PathBuf {
    work_dir.join(LOGS_DIR).join(SESSION_LOGS_DIR)
}

/// `cmd_runner_logs_<YYYYMMDD_HHMMSS>.log`
#[must_use]
pub fn session_log_file_name(at: &DateTime<Local>) -> String {
    format!(
        "{SESSION_LOG_PREFIX}{}.{SESSION_LOG_EXTENSION}",
        at.format("%Y%m%d_%H%M%S")
    )
}

/// `<work_dir>/tempCodeRunner.<extension>`
#[must_use]
pub fn scratch_script_path(work_dir: &Path, extension: &str) -> PathBuf {
    work_dir.join(format!("{SCRATCH_STEM}.{extension}"))
}

/// `<work_dir>/tempCodeRunner.txt`
#[must_use]
pub fn scratch_capture_path(work_dir: &Path) -> PathBuf {
    work_dir.join(format!("{SCRATCH_STEM}.{CAPTURE_EXTENSION}"))
}
