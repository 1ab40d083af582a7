use crate::error::RunnerError;
use std::time::Duration;

use super::CommandSpec;

// ============================================================================
// ProcessRunner Trait - Process Execution Interface
// ============================================================================

/// Raw output from a process that ran to completion.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output bytes
    pub stdout: Vec<u8>,
    /// Standard error bytes
    pub stderr: Vec<u8>,
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
    /// Wall-clock time from spawn to exit
    pub elapsed: Duration,
}

impl ProcessOutput {
    #[must_use]
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>, elapsed: Duration) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
            elapsed,
        }
    }

    /// Exit code with signal termination mapped to `-1`.
    #[must_use]
    pub fn code_or_signal(&self) -> i32 {
        self.exit_code.unwrap_or(-1)
    }

    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for process execution.
///
/// # Threading
///
/// `ProcessRunner` is a synchronous interface. Implementations MAY internally
/// drive an async runtime (e.g., Tokio for timeouts) but MUST NOT expose async
/// in the public API.
///
/// # Example
///
/// ```rust
/// use cmdrunner_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
/// use std::time::Duration;
///
/// struct CannedRunner;
///
/// impl ProcessRunner for CannedRunner {
///     fn run(&self, _cmd: &CommandSpec, _timeout: Duration) -> Result<ProcessOutput, RunnerError> {
///         Ok(ProcessOutput::new(b"hello\n".to_vec(), Vec::new(), Some(0), Duration::ZERO))
///     }
/// }
///
/// let output = CannedRunner.run(&CommandSpec::new("sh"), Duration::from_secs(1)).unwrap();
/// assert!(output.success());
/// ```
pub trait ProcessRunner {
    /// Execute a command with the given timeout.
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessOutput)` - The process completed (possibly with non-zero exit code)
    /// * `Err(RunnerError::Timeout)` - The deadline fired; the process tree was terminated
    /// * `Err(RunnerError::SpawnFailed)` - The program could not be started
    /// * `Err(RunnerError::*)` - Other supervision errors
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError> {
        (**self).run(cmd, timeout)
    }
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for Box<R> {
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError> {
        (**self).run(cmd, timeout)
    }
}
