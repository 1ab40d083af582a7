use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use cmdrunner_config::Config;
use cmdrunner_runner::{OutputEncoding, ProcessRunner, Shell, ShellRunner};
use cmdrunner_utils::error::CmdRunnerError;
use cmdrunner_utils::logging::execution_span;
use cmdrunner_utils::session_log::{LogEntry, SessionLog};

use crate::{
    ExecutionOutcome, ExecutionRequest, ExecutionResult, ScratchArtifacts, normalize,
};

// ============================================================================
// CodeExecutor - One Session of Bounded Command Execution
// ============================================================================

/// Runs shell commands one at a time under a timeout and logs each of them.
///
/// The working directory, shell and session log path are fixed at
/// construction. `execute` takes `&mut self`, so a second call cannot start
/// while one is in flight.
///
/// Per-call failures (timeout, spawn failure, scratch file I/O) come back
/// inside [`ExecutionResult`]; only construction can fail.
#[derive(Debug)]
pub struct CodeExecutor<R: ProcessRunner = ShellRunner> {
    runner: R,
    shell: Shell,
    encoding: OutputEncoding,
    work_dir: PathBuf,
    timeout: Duration,
    artifacts: ScratchArtifacts,
    log: SessionLog,
}

impl CodeExecutor<ShellRunner> {
    /// Executor backed by real shell processes.
    pub fn new(config: &Config) -> Result<Self, CmdRunnerError> {
        let runner = ShellRunner::new()?.with_kill_grace(config.kill_grace());
        Self::with_runner(config, runner)
    }
}

impl<R: ProcessRunner> CodeExecutor<R> {
    /// Executor backed by an arbitrary [`ProcessRunner`].
    ///
    /// Opens the session log under `<work_dir>/logs/cmd_runner_logs/`; failure
    /// to do so is fatal.
    pub fn with_runner(config: &Config, runner: R) -> Result<Self, CmdRunnerError> {
        let encoding = config.output_encoding()?;
        let work_dir = std::path::absolute(config.work_dir())?;
        let shell = config.shell();
        let log = SessionLog::open(&work_dir)?.with_mirror(config.mirror());
        let artifacts = ScratchArtifacts::for_shell(&work_dir, &shell);

        info!(
            work_dir = %work_dir.display(),
            shell = %shell.program.to_string_lossy(),
            encoding = encoding.name(),
            timeout_secs = config.timeout().as_secs(),
            "executor ready"
        );

        Ok(Self {
            runner,
            shell,
            encoding,
            work_dir,
            timeout: config.timeout(),
            artifacts,
            log,
        })
    }

    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    #[must_use]
    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Default timeout applied when a request carries none.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn shell(&self) -> &Shell {
        &self.shell
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.log.is_closed()
    }

    /// Run a command with the default timeout.
    pub fn execute_cmd(&mut self, command: &str) -> ExecutionResult {
        self.execute(ExecutionRequest::new(command))
    }

    /// Run one request to completion, timeout or spawn failure.
    pub fn execute(&mut self, request: ExecutionRequest) -> ExecutionResult {
        let normalized = normalize(&request.command);
        let timeout = request.timeout.unwrap_or(self.timeout);
        let span = execution_span(normalized.multi_line, timeout);
        let _guard = span.enter();

        if let Err(err) = self.log.reset() {
            warn!(error = %err, "failed to reset session log");
        }
        self.record(&LogEntry::info(format!("COMMAND: {}", normalized.command)));

        let result = if normalized.multi_line {
            self.run_script(&normalized.command, timeout)
        } else {
            self.run_line(&normalized.command, timeout)
        };

        for entry in result.log_entries() {
            self.record(&entry);
        }
        debug!(
            success = result.success,
            exit_code = result.exit_code,
            failure = ?result.failure,
            "execution finished"
        );
        result
    }

    /// Close the session log. Later calls do nothing.
    pub fn close(&mut self) {
        if self.log.is_closed() {
            return;
        }
        self.record(&LogEntry::info("session closed"));
        self.log.close();
    }

    fn run_line(&self, command: &str, timeout: Duration) -> ExecutionResult {
        let spec = self.shell.command_spec(command).cwd(&self.work_dir);
        let outcome = ExecutionOutcome::from_run(self.runner.run(&spec, timeout), self.encoding);
        ExecutionResult::assemble(outcome, command)
    }

    fn run_script(&self, command: &str, timeout: Duration) -> ExecutionResult {
        let wrapped = match self.artifacts.materialize(command, &self.shell, self.encoding) {
            Ok(wrapped) => wrapped,
            Err(err) => return ExecutionResult::artifact_failure(&err, -1, command),
        };

        let spec = self.shell.command_spec(&wrapped).cwd(&self.work_dir);
        match ExecutionOutcome::from_run(self.runner.run(&spec, timeout), self.encoding) {
            // The script's own output went to the capture file, stderr included
            ExecutionOutcome::Completed { exit_code, .. } => {
                match self.artifacts.read_capture(self.encoding) {
                    Ok(captured) => ExecutionResult::assemble(
                        ExecutionOutcome::Completed {
                            exit_code,
                            stdout: captured.text,
                            stderr: String::new(),
                        },
                        command,
                    ),
                    Err(err) => ExecutionResult::artifact_failure(&err, exit_code, command),
                }
            }
            other => ExecutionResult::assemble(other, command),
        }
    }

    fn record(&mut self, entry: &LogEntry) {
        if let Err(err) = self.log.record(entry) {
            warn!(error = %err, "failed to write session log entry");
        }
    }
}
