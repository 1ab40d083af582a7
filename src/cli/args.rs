//! CLI argument definitions and parsing structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cmdrunner - bounded shell command execution
#[derive(Debug, Parser)]
#[command(name = "cmdrunner")]
#[command(about = "Run shell commands under a hard timeout with session logging")]
#[command(long_about = r#"
cmdrunner runs opaque shell commands in a fixed working directory with a hard
wall-clock timeout. Multi-line commands are written to a scratch script and run
as a unit. Every command is recorded in logs/cmd_runner_logs/.

EXAMPLES:
  # Interactive session (default)
  cmdrunner

  # Run one command and print the result as JSON
  cmdrunner run "echo hello" --json

  # Run a multi-line script from stdin with a 5 second limit
  printf 'echo one\necho two\n' | cmdrunner run --timeout 5

  # Check that the host shell behaves as expected
  cmdrunner self-test

CONFIGURATION:
  Precedence: CLI flags > CMDRUNNER_* environment > config file > defaults
  The config file is discovered by searching upward from CWD for
  .cmdrunner/config.toml; use --config to name one explicitly.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory commands run in; logs and scratch files are written here
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Default timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=86_400))]
    pub timeout: Option<u64>,

    /// Output encoding label (e.g. utf-8, windows-1254, ibm866)
    #[arg(long, global = true)]
    pub encoding: Option<String>,

    /// Shell program override (e.g. bash)
    #[arg(long, global = true)]
    pub shell: Option<String>,

    /// Enable verbose diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one command and exit with a code reflecting its result
    Run {
        /// Command text; read from stdin when omitted or `-`
        command: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive prompt (default when no subcommand is given)
    Repl,

    /// Run the built-in echo / unknown command / empty output checks
    SelfTest {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration and where each value came from
    Config {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
