use cmdrunner_runner::OutputEncoding;
use cmdrunner_utils::error::ConfigError;

use crate::Config;

/// Upper bound for `timeout_secs` (one day)
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Upper bound for `kill_grace_ms`
pub const MAX_KILL_GRACE_MS: u64 = 60_000;

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(timeout) = self.executor.timeout_secs {
            if timeout == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "timeout_secs".to_string(),
                    value: "must be at least 1 second".to_string(),
                });
            }
            if timeout > MAX_TIMEOUT_SECS {
                return Err(ConfigError::InvalidValue {
                    key: "timeout_secs".to_string(),
                    value: format!("exceeds maximum of {MAX_TIMEOUT_SECS} seconds"),
                });
            }
        }

        if let Some(grace) = self.executor.kill_grace_ms
            && grace > MAX_KILL_GRACE_MS
        {
            return Err(ConfigError::InvalidValue {
                key: "kill_grace_ms".to_string(),
                value: format!("exceeds maximum of {MAX_KILL_GRACE_MS} ms"),
            });
        }

        if let Some(label) = &self.executor.encoding
            && OutputEncoding::for_label(label).is_err()
        {
            return Err(ConfigError::InvalidValue {
                key: "encoding".to_string(),
                value: format!("unknown encoding label '{label}'"),
            });
        }

        if let Some(shell) = &self.executor.shell
            && shell.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                key: "shell".to_string(),
                value: "must not be empty".to_string(),
            });
        }

        let work_dir = self.work_dir();
        if !work_dir.is_dir() {
            return Err(ConfigError::InvalidValue {
                key: "work_dir".to_string(),
                value: format!("{} is not an existing directory", work_dir.display()),
            });
        }

        Ok(())
    }
}
