//! Error types for the runner crate

use std::time::Duration;
use thiserror::Error;

/// Errors raised while spawning or supervising a shell process
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Execution timed out after {} seconds", .timeout.as_secs_f64())]
    Timeout {
        timeout: Duration,
        elapsed: Duration,
    },

    #[error("Failed to read {stream}: {reason}")]
    PipeFailed {
        stream: &'static str,
        reason: String,
    },

    #[error("Failed to wait for process: {reason}")]
    WaitFailed { reason: String },

    #[error("Process tree setup failed: {reason}")]
    ProcessTreeFailed { reason: String },

    #[error("Async runtime unavailable: {reason}")]
    RuntimeUnavailable { reason: String },

    #[error("Unknown output encoding: {label}")]
    UnknownEncoding { label: String },
}

impl RunnerError {
    /// True when the process never started.
    #[must_use]
    pub const fn is_spawn_failure(&self) -> bool {
        matches!(self, Self::SpawnFailed { .. })
    }

    /// True when the deadline fired before the process finished.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
