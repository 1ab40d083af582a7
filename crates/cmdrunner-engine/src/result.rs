use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use cmdrunner_utils::error::ArtifactError;
use cmdrunner_utils::session_log::LogEntry;

use crate::ExecutionOutcome;

/// Stdout substituted when a command exits `0` without printing anything.
pub const NO_OUTPUT_SENTINEL: &str = "COMMAND EXECUTED BUT PRODUCED NO OUTPUT.";

/// Stderr reported for a timed-out command.
pub const TIMEOUT_STDERR: &str = "TimeoutExpired";

/// Per-call failure classes. All of them are captured, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    TimeoutExceeded,
    SpawnFailure,
    ArtifactIoFailure,
}

/// Caller-facing result of one execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Process exit code; `-1` when there is none.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// The normalized command as submitted (not the scratch-script wrapper).
    pub command: String,
    pub timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl ExecutionResult {
    /// Package an outcome.
    ///
    /// Output is trimmed; a clean exit with no output at all reports
    /// [`NO_OUTPUT_SENTINEL`] on stdout.
    #[must_use]
    pub fn assemble(outcome: ExecutionOutcome, command: impl Into<String>) -> Self {
        let command = command.into();
        let timestamp = Local::now();

        match outcome {
            ExecutionOutcome::Completed {
                exit_code,
                stdout,
                stderr,
            } => {
                let mut stdout = stdout.trim().to_string();
                let stderr = stderr.trim().to_string();
                if stdout.is_empty() && stderr.is_empty() && exit_code == 0 {
                    stdout = NO_OUTPUT_SENTINEL.to_string();
                }
                Self {
                    success: exit_code == 0,
                    exit_code,
                    stdout,
                    stderr,
                    command,
                    timestamp,
                    error: None,
                    failure: None,
                }
            }
            ExecutionOutcome::TimedOut { timeout, .. } => Self {
                success: false,
                exit_code: -1,
                stdout: String::new(),
                stderr: TIMEOUT_STDERR.to_string(),
                command,
                timestamp,
                error: Some(format!(
                    "command did not finish within {} seconds",
                    timeout.as_secs_f64()
                )),
                failure: Some(FailureKind::TimeoutExceeded),
            },
            ExecutionOutcome::SpawnFailed { reason } => Self {
                success: false,
                exit_code: -1,
                stdout: String::new(),
                error: Some(format!("command failed to start: {reason}")),
                stderr: reason,
                command,
                timestamp,
                failure: Some(FailureKind::SpawnFailure),
            },
        }
    }

    /// Package a scratch script or capture file failure.
    ///
    /// `exit_code` is the process's code when it ran, `-1` when it never did.
    #[must_use]
    pub fn artifact_failure(
        error: &ArtifactError,
        exit_code: i32,
        command: impl Into<String>,
    ) -> Self {
        let message = error.to_string();
        Self {
            success: false,
            exit_code,
            stdout: String::new(),
            stderr: message.clone(),
            command: command.into(),
            timestamp: Local::now(),
            error: Some(message),
            failure: Some(FailureKind::ArtifactIoFailure),
        }
    }

    /// Session log lines describing this result.
    ///
    /// Failures are logged once as ERROR; otherwise non-empty stdout is INFO
    /// and non-empty stderr is WARNING.
    #[must_use]
    pub fn log_entries(&self) -> Vec<LogEntry> {
        if let Some(error) = &self.error {
            return vec![LogEntry::error(error.clone())];
        }

        let mut entries = Vec::with_capacity(2);
        if !self.stdout.is_empty() {
            entries.push(LogEntry::info(format!("STDOUT : {}", self.stdout)));
        }
        if !self.stderr.is_empty() {
            entries.push(LogEntry::warning(format!("STDERR : {}", self.stderr)));
        }
        entries
    }
}
