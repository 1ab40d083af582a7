//! cmdrunner - bounded shell command execution
//!
//! Runs opaque shell commands in a fixed working directory under a hard
//! wall-clock timeout, kills the whole process tree when the deadline fires,
//! and records every command in a per-session log file.
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use cmdrunner::{CodeExecutor, Config, ExecutionRequest};
//! use std::time::Duration;
//!
//! let config = Config::builder()
//!     .work_dir(".")
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .expect("valid config");
//!
//! let mut executor = CodeExecutor::new(&config).expect("session log");
//! let result = executor.execute(ExecutionRequest::new("echo hello"));
//! assert_eq!(result.stdout, "hello");
//! executor.close();
//! ```
//!
//! # Crates
//!
//! - `cmdrunner-runner`: process spawning, timeout race, process-tree kill
//! - `cmdrunner-utils`: errors, session log, paths, tracing setup
//! - `cmdrunner-config`: discovery, precedence, validation
//! - `cmdrunner-engine`: normalization, scratch scripts, result assembly

pub mod cli;
pub mod exit_codes;

pub use exit_codes::ExitCode;

pub use cmdrunner_config::{CliArgs, Config, ConfigBuilder, ConfigSource};
pub use cmdrunner_engine::{
    CodeExecutor, ExecutionOutcome, ExecutionRequest, ExecutionResult, FailureKind,
    NO_OUTPUT_SENTINEL, NormalizedCommand, ScratchArtifacts, SelfTestReport, TIMEOUT_STDERR,
    normalize,
};
pub use cmdrunner_runner::{
    CommandSpec, OutputEncoding, ProcessOutput, ProcessRunner, RunnerError, Shell, ShellKind,
    ShellRunner,
};
pub use cmdrunner_utils::error::{ArtifactError, CmdRunnerError, ConfigError, SessionLogError};
pub use cmdrunner_utils::session_log::{LogEntry, LogLevel, RESET_SENTINEL, SessionLog};
