//! Exit code constants and mapping for cmdrunner
//!
//! `run` exits with a code derived from the command's result; every other
//! failure maps from [`CmdRunnerError`].

use cmdrunner_engine::{ExecutionResult, FailureKind};
use cmdrunner_utils::error::{CmdRunnerError, ErrorCategory};

/// Exit code constants for cmdrunner
pub mod codes {
    /// Success - the command ran and exited 0
    pub const SUCCESS: i32 = 0;

    /// Command failed - the command ran and exited non-zero
    pub const COMMAND_FAILED: i32 = 1;

    /// CLI arguments or configuration error
    pub const CLI_ARGS: i32 = 2;

    /// Timeout - the command exceeded its deadline and was killed
    pub const TIMEOUT: i32 = 10;

    /// Spawn failure - the shell could not be started
    pub const SPAWN_FAILURE: i32 = 70;

    /// I/O failure - scratch artifacts or the session log could not be used
    pub const IO_FAILURE: i32 = 74;
}

/// Type-safe process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    pub const SUCCESS: Self = Self(codes::SUCCESS);
    pub const COMMAND_FAILED: Self = Self(codes::COMMAND_FAILED);
    pub const CLI_ARGS: Self = Self(codes::CLI_ARGS);
    pub const TIMEOUT: Self = Self(codes::TIMEOUT);
    pub const SPAWN_FAILURE: Self = Self(codes::SPAWN_FAILURE);
    pub const IO_FAILURE: Self = Self(codes::IO_FAILURE);

    /// Numeric value for `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Exit code for a finished execution.
    #[must_use]
    pub fn from_result(result: &ExecutionResult) -> Self {
        match result.failure {
            Some(FailureKind::TimeoutExceeded) => Self::TIMEOUT,
            Some(FailureKind::SpawnFailure) => Self::SPAWN_FAILURE,
            Some(FailureKind::ArtifactIoFailure) => Self::IO_FAILURE,
            None if result.success => Self::SUCCESS,
            None => Self::COMMAND_FAILED,
        }
    }

    /// Exit code for an error that stopped the CLI before or outside execution.
    #[must_use]
    pub fn from_error(error: &CmdRunnerError) -> Self {
        match error {
            CmdRunnerError::Runner(runner) if runner.is_spawn_failure() => Self::SPAWN_FAILURE,
            CmdRunnerError::Runner(runner) if runner.is_timeout() => Self::TIMEOUT,
            other => match other.category() {
                ErrorCategory::Configuration => Self::CLI_ARGS,
                ErrorCategory::Execution => Self::SPAWN_FAILURE,
                ErrorCategory::FileSystem => Self::IO_FAILURE,
            },
        }
    }
}

impl From<&CmdRunnerError> for ExitCode {
    fn from(error: &CmdRunnerError) -> Self {
        Self::from_error(error)
    }
}
