//! Handlers for the non-interactive subcommands

use std::io::{self, Read};

use cmdrunner_config::Config;
use cmdrunner_engine::{CodeExecutor, ExecutionResult, NO_OUTPUT_SENTINEL};
use cmdrunner_utils::error::CmdRunnerError;

use crate::ExitCode;

/// Print an error with its remediation hint, if any.
pub(super) fn report_error(error: &CmdRunnerError) {
    eprintln!("✗ {error}");
    if let Some(suggestion) = error.suggestion() {
        eprintln!("  Suggestion: {suggestion}");
    }
}

pub(super) fn open_executor(config: &Config) -> Result<CodeExecutor, ExitCode> {
    CodeExecutor::new(config).map_err(|err| {
        report_error(&err);
        ExitCode::from(&err)
    })
}

/// Human-readable rendering used by `run` and the REPL.
///
/// Non-empty stdout and stderr are printed as `OUTPUT:` and `ERROR:` blocks.
/// With neither, a successful run prints the no-output message and a failed
/// one prints its error.
#[must_use]
pub fn render_result(result: &ExecutionResult) -> String {
    let mut out = String::new();
    if !result.stdout.is_empty() {
        out.push_str(&format!("OUTPUT:\n{}\n", result.stdout));
    }
    if !result.stderr.is_empty() {
        out.push_str(&format!("ERROR:\n{}\n", result.stderr));
    }
    if out.trim().is_empty() {
        if result.success {
            out = format!("{NO_OUTPUT_SENTINEL}\n");
        } else if let Some(error) = &result.error {
            out = format!("EXECUTION ERROR: {error}\n");
        }
    }
    out
}

/// `cmdrunner run`
pub(super) fn run_once(config: &Config, command: Option<String>, json: bool) -> Result<(), ExitCode> {
    let command = match command {
        Some(command) if command != "-" => command,
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(|err| {
                eprintln!("✗ Failed to read command from stdin: {err}");
                ExitCode::IO_FAILURE
            })?;
            buffer
        }
    };

    let mut executor = open_executor(config)?;
    let result = executor.execute_cmd(&command);
    executor.close();

    if json {
        let rendered = serde_json::to_string_pretty(&result).map_err(|err| {
            eprintln!("✗ Failed to serialize result: {err}");
            ExitCode::IO_FAILURE
        })?;
        println!("{rendered}");
    } else {
        print!("{}", render_result(&result));
    }

    match ExitCode::from_result(&result) {
        ExitCode::SUCCESS => Ok(()),
        code => Err(code),
    }
}

/// `cmdrunner self-test`
pub(super) fn self_test(config: &Config, json: bool) -> Result<(), ExitCode> {
    let mut executor = open_executor(config)?;
    let report = executor.self_test();
    executor.close();

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|err| {
            eprintln!("✗ Failed to serialize report: {err}");
            ExitCode::IO_FAILURE
        })?;
        println!("{rendered}");
    } else {
        println!("{report}");
    }

    if report.all_passed() {
        Ok(())
    } else {
        Err(ExitCode::COMMAND_FAILED)
    }
}

/// `cmdrunner config`
pub(super) fn show_config(config: &Config, json: bool) -> Result<(), ExitCode> {
    let effective = config.effective_config();

    if json {
        let map: serde_json::Map<String, serde_json::Value> = effective
            .iter()
            .map(|(key, (value, source))| {
                (
                    key.clone(),
                    serde_json::json!({ "value": value, "source": source }),
                )
            })
            .collect();
        let rendered = serde_json::to_string_pretty(&map).map_err(|err| {
            eprintln!("✗ Failed to serialize configuration: {err}");
            ExitCode::IO_FAILURE
        })?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Effective configuration:");
    for (key, (value, source)) in &effective {
        println!("  {key:<14} = {value:<32} [{source}]");
    }
    Ok(())
}
