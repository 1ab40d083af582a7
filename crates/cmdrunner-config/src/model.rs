use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use cmdrunner_runner::{OutputEncoding, RunnerError, Shell};
use cmdrunner_utils::types::ConfigSource;

/// Default wall-clock bound for one command, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default SIGTERM-to-SIGKILL grace period, in milliseconds
pub const DEFAULT_KILL_GRACE_MS: u64 = 1000;

/// Default output encoding label
pub const DEFAULT_ENCODING: &str = "utf-8";

/// `[executor]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExecutorConfig {
    /// Directory commands run in and where logs/scratch files live.
    pub work_dir: Option<PathBuf>,
    /// Default per-command timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// WHATWG label for decoding output and encoding scratch scripts.
    pub encoding: Option<String>,
    /// Grace period between SIGTERM and SIGKILL on timeout.
    pub kill_grace_ms: Option<u64>,
    /// Interpreter override, e.g. `bash` instead of `sh`.
    pub shell: Option<String>,
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    /// Mirror session log entries to the console.
    pub mirror: Option<bool>,
}

/// Configuration for cmdrunner.
///
/// Use [`Config::discover()`] for CLI behaviour:
/// - searches upward from the current directory for `.cmdrunner/config.toml`
/// - applies `CMDRUNNER_TIMEOUT` / `CMDRUNNER_ENCODING`
/// - applies CLI overrides
///
/// Use [`Config::builder()`] when embedding.
///
/// # Configuration File Format
///
/// ```toml
/// [executor]
/// work_dir = "."
/// timeout_secs = 30
/// encoding = "utf-8"
/// kill_grace_ms = 1000
///
/// [logging]
/// verbose = false
/// mirror = true
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub executor: ExecutorConfig,
    pub logging: LoggingConfig,
    /// Source attribution for each setting (for `cmdrunner config`).
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Config {
    /// Working directory; the process's current directory when unset.
    #[must_use]
    pub fn work_dir(&self) -> PathBuf {
        self.executor
            .work_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.executor.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn kill_grace(&self) -> Duration {
        Duration::from_millis(self.executor.kill_grace_ms.unwrap_or(DEFAULT_KILL_GRACE_MS))
    }

    #[must_use]
    pub fn encoding_label(&self) -> &str {
        self.executor.encoding.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    pub fn output_encoding(&self) -> Result<OutputEncoding, RunnerError> {
        OutputEncoding::for_label(self.encoding_label())
    }

    /// Host shell, with the configured interpreter if any.
    #[must_use]
    pub fn shell(&self) -> Shell {
        match self.executor.shell.as_deref() {
            Some(program) => Shell::host().with_program(program),
            None => Shell::host(),
        }
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }

    #[must_use]
    pub fn mirror(&self) -> bool {
        self.logging.mirror.unwrap_or(true)
    }

    /// Source for `key`, `Defaults` when never set.
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .cloned()
            .unwrap_or(ConfigSource::Defaults)
    }
}
