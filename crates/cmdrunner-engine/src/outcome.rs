use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use cmdrunner_runner::{OutputEncoding, ProcessOutput, RunnerError};

/// One command submitted to a [`CodeExecutor`](crate::CodeExecutor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Raw command text; line breaks at either end are stripped before running.
    pub command: String,
    /// Overrides the executor's default timeout for this call only.
    pub timeout: Option<Duration>,
}

impl ExecutionRequest {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: None,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&str> for ExecutionRequest {
    fn from(command: &str) -> Self {
        Self::new(command)
    }
}

impl From<String> for ExecutionRequest {
    fn from(command: String) -> Self {
        Self::new(command)
    }
}

/// How a single process run ended. Exactly one variant per execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The process exited on its own; `exit_code` is `-1` for signal deaths.
    Completed {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    /// The deadline fired and the process tree was killed.
    TimedOut { elapsed: Duration, timeout: Duration },
    /// The shell could not be started.
    SpawnFailed { reason: String },
}

impl ExecutionOutcome {
    /// Classify a runner result, decoding output with `encoding`.
    #[must_use]
    pub fn from_run(result: Result<ProcessOutput, RunnerError>, encoding: OutputEncoding) -> Self {
        match result {
            Ok(output) => {
                let stdout = encoding.decode(&output.stdout);
                let stderr = encoding.decode(&output.stderr);
                if stdout.had_replacements || stderr.had_replacements {
                    debug!(encoding = encoding.name(), "malformed output bytes replaced");
                }
                Self::Completed {
                    exit_code: output.code_or_signal(),
                    stdout: stdout.text,
                    stderr: stderr.text,
                }
            }
            Err(RunnerError::Timeout { timeout, elapsed }) => Self::TimedOut { elapsed, timeout },
            Err(RunnerError::SpawnFailed { reason, .. }) => Self::SpawnFailed { reason },
            // Supervision failed after the process existed; nothing usable came back
            Err(other) => Self::SpawnFailed {
                reason: other.to_string(),
            },
        }
    }
}
