//! Shell process execution for cmdrunner
//!
//! Spawns a platform shell with an opaque command string, races the process
//! against a wall-clock deadline and terminates the whole process tree when the
//! deadline wins.
//!
//! The public surface is synchronous. [`ShellRunner`] owns a current-thread
//! Tokio runtime and blocks on it, so callers never see async.

mod command_spec;
mod encoding;
mod error;
mod io;
mod platform;
mod process;
mod shell;
mod types;

pub use command_spec::CommandSpec;
pub use encoding::{DecodedText, OutputEncoding};
pub use error::RunnerError;
pub use process::{ProcessOutput, ProcessRunner};
pub use shell::{DEFAULT_KILL_GRACE, ShellRunner};
pub use types::{Shell, ShellKind};
