//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, discovers configuration, installs the tracing
//! subscriber and dispatches. It prints every error itself; `main` only turns
//! the returned [`ExitCode`] into a process exit.

use clap::Parser;
use tracing::debug;

use cmdrunner_config::{CliArgs, Config};
use cmdrunner_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::{commands, repl};
use crate::ExitCode;

/// Main CLI execution function.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        work_dir: cli.work_dir.clone(),
        timeout_secs: cli.timeout,
        encoding: cli.encoding.clone(),
        shell: cli.shell.clone(),
        verbose: cli.verbose.then_some(true),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("✗ Configuration error: {err:#}");
            eprintln!("  Suggestion: check .cmdrunner/config.toml, CMDRUNNER_* variables and CLI flags");
            return Err(ExitCode::CLI_ARGS);
        }
    };

    if let Err(err) = init_tracing(config.verbose()) {
        eprintln!("warning: tracing unavailable: {err}");
    }
    debug!(command = ?cli.command, "configuration loaded");

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Run { command, json } => commands::run_once(&config, command, json),
        Commands::Repl => repl::run_repl(&config),
        Commands::SelfTest { json } => commands::self_test(&config, json),
        Commands::Config { json } => commands::show_config(&config, json),
    }
}
