//! Error taxonomy for cmdrunner
//!
//! Per-call failures (timeouts, spawn failures, scratch artifact I/O) are
//! captured into the execution result by the engine and never surface as
//! `Err`. The types here are for construction-time and configuration failures,
//! plus the artifact errors the engine classifies before packaging them.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use cmdrunner_runner::RunnerError;

/// Top-level error type for cmdrunner
#[derive(Error, Debug)]
pub enum CmdRunnerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("Session log error: {0}")]
    SessionLog(#[from] SessionLogError),

    #[error("Scratch artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Broad classification used for exit codes and user-facing hints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Execution,
    FileSystem,
}

impl CmdRunnerError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Runner(RunnerError::UnknownEncoding { .. }) => ErrorCategory::Configuration,
            Self::Runner(_) => ErrorCategory::Execution,
            Self::SessionLog(_) | Self::Artifact(_) | Self::Io(_) => ErrorCategory::FileSystem,
        }
    }

    /// Short remediation hint, if one applies.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config(ConfigError::InvalidValue { .. }) => {
                Some("Check the value in .cmdrunner/config.toml or the matching CLI flag")
            }
            Self::Config(ConfigError::NotFound { .. }) => {
                Some("Pass an existing file with --config or remove the flag to use discovery")
            }
            Self::SessionLog(_) => {
                Some("Make sure the working directory is writable; logs go to logs/cmd_runner_logs/")
            }
            Self::Runner(RunnerError::UnknownEncoding { .. }) => {
                Some("Use a WHATWG encoding label such as utf-8, windows-1254 or ibm866")
            }
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

/// Failures of the per-session log file
#[derive(Error, Debug)]
pub enum SessionLogError {
    #[error("cannot create log directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("cannot open log file {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot write log file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Failures around the multi-line scratch script and its capture file
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("cannot write scratch file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("cannot read output capture file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("output capture file not found: {}", path.display())]
    CaptureMissing { path: PathBuf },
}
