//! Configuration management for cmdrunner
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > environment > file > defaults. Supports TOML configuration files with
//! `[executor]` and `[logging]` sections.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use cmdrunner_utils::types::ConfigSource;
pub use discovery::{CONFIG_DIR, CONFIG_FILE, ENV_ENCODING, ENV_TIMEOUT};
pub use model::*;
pub use validation::{MAX_KILL_GRACE_MS, MAX_TIMEOUT_SECS};
