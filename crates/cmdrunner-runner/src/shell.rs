use crate::error::RunnerError;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::io::{PipeReadError, read_pipes_until_exit};
use super::platform::ProcessTree;
use super::{CommandSpec, ProcessOutput, ProcessRunner};

/// Time between SIGTERM and SIGKILL when a deadline fires.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(1);

// ============================================================================
// ShellRunner - Deadline-Bounded Process Execution
// ============================================================================

/// Process runner that races each child against a wall-clock deadline.
///
/// Two tasks run concurrently inside one `tokio::select!`: the process task
/// (drain stdout/stderr, then `wait`) and a sleep until the deadline. If the
/// process finishes first the timer is dropped. If the timer finishes first the
/// process tree is terminated and reaped before [`RunnerError::Timeout`] is
/// returned, so nothing spawned by the command is left running.
///
/// # Threading
///
/// `ShellRunner` owns a current-thread Tokio runtime and blocks on it. Calling
/// [`ProcessRunner::run`] from inside another Tokio runtime panics.
#[derive(Debug)]
pub struct ShellRunner {
    runtime: Runtime,
    kill_grace: Duration,
}

enum Race {
    Exited(Result<std::process::ExitStatus, PipeReadError>),
    DeadlineElapsed,
}

impl ShellRunner {
    /// Create a runner with the default kill grace period.
    pub fn new() -> Result<Self, RunnerError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RunnerError::RuntimeUnavailable {
                reason: e.to_string(),
            })?;

        Ok(Self {
            runtime,
            kill_grace: DEFAULT_KILL_GRACE,
        })
    }

    /// Override the SIGTERM-to-SIGKILL grace period.
    #[must_use]
    pub const fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    #[must_use]
    pub const fn kill_grace(&self) -> Duration {
        self.kill_grace
    }

    async fn run_async(
        &self,
        cmd: &CommandSpec,
        timeout: Duration,
    ) -> Result<ProcessOutput, RunnerError> {
        let mut command = cmd.to_tokio_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let tree = ProcessTree::prepare(&mut command)?;

        let started = Instant::now();
        let mut child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: cmd.program_lossy(),
            reason: e.to_string(),
        })?;
        debug!(pid = ?child.id(), program = %cmd.program_lossy(), "process spawned");

        if let Err(err) = tree.adopt(&child) {
            // Still bounded by the deadline, only grandchildren may escape
            warn!(error = %err, "could not attach process to its tree");
        }

        let mut stdout_pipe = child.stdout.take().ok_or_else(|| RunnerError::PipeFailed {
            stream: "stdout",
            reason: "pipe was not captured".to_string(),
        })?;
        let mut stderr_pipe = child.stderr.take().ok_or_else(|| RunnerError::PipeFailed {
            stream: "stderr",
            reason: "pipe was not captured".to_string(),
        })?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let race = tokio::select! {
            result = read_pipes_until_exit(
                &mut child,
                &mut stdout_pipe,
                &mut stderr_pipe,
                &mut stdout,
                &mut stderr,
            ) => Race::Exited(result),
            () = tokio::time::sleep(timeout) => Race::DeadlineElapsed,
        };

        match race {
            Race::Exited(result) => {
                let status = result.map_err(map_pipe_error)?;
                let elapsed = started.elapsed();
                debug!(?status, elapsed_ms = elapsed.as_millis() as u64, "process exited");
                Ok(ProcessOutput::new(stdout, stderr, status.code(), elapsed))
            }
            Race::DeadlineElapsed => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    partial_stdout_bytes = stdout.len(),
                    partial_stderr_bytes = stderr.len(),
                    "deadline reached, terminating process tree"
                );
                tree.terminate(&mut child, self.kill_grace).await;

                Err(RunnerError::Timeout {
                    timeout,
                    elapsed: started.elapsed(),
                })
            }
        }
    }
}

impl ProcessRunner for ShellRunner {
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError> {
        self.runtime.block_on(self.run_async(cmd, timeout))
    }
}

fn map_pipe_error(error: PipeReadError) -> RunnerError {
    match error {
        PipeReadError::Stdout(err) => RunnerError::PipeFailed {
            stream: "stdout",
            reason: err.to_string(),
        },
        PipeReadError::Stderr(err) => RunnerError::PipeFailed {
            stream: "stderr",
            reason: err.to_string(),
        },
        PipeReadError::Wait(err) => RunnerError::WaitFailed {
            reason: err.to_string(),
        },
    }
}
