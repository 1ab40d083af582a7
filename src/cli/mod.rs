//! Command-line interface for cmdrunner
//!
//! - `args`: clap argument definitions
//! - `run`: entry point, configuration discovery and dispatch
//! - `commands`: `run`, `self-test` and `config` handlers
//! - `repl`: interactive prompt loop

pub mod args;
mod commands;
mod repl;
mod run;

pub use args::{Cli, Commands};
pub use commands::render_result;
pub use repl::{PROMPT, ReplInput, repl_loop};
pub use run::run;
