//! Shared types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of a configuration value.
///
/// Precedence, highest first: CLI arguments, environment variables, config
/// file, programmatic builder, built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument.
    Cli,
    /// Value read from a `CMDRUNNER_*` environment variable.
    Env,
    /// Value read from a config file.
    #[serde(rename = "config")]
    ConfigFile(PathBuf),
    /// Value set through `ConfigBuilder`.
    Programmatic,
    /// Built-in default.
    Defaults,
}

impl ConfigSource {
    /// Short label for status display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Env => "env",
            Self::ConfigFile(_) => "config",
            Self::Programmatic => "programmatic",
            Self::Defaults => "default",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigFile(path) => write!(f, "config ({})", path.display()),
            other => f.write_str(other.label()),
        }
    }
}
