//! End-to-end tests for `CodeExecutor` against the host `sh`
//!
//! Covers:
//! - single-line commands (output, silent success, unknown command)
//! - multi-line scripts (scratch artifacts, folded stderr, overwrite per run)
//! - timeouts and spawn failures captured into the result
//! - session log content and teardown

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use cmdrunner::{
    CodeExecutor, Config, ExecutionRequest, FailureKind, NO_OUTPUT_SENTINEL, RESET_SENTINEL,
    TIMEOUT_STDERR,
};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn config_for(dir: &Path) -> Config {
    Config::builder()
        .work_dir(dir)
        .timeout(Duration::from_secs(10))
        .kill_grace(Duration::from_millis(200))
        .mirror(false)
        .build()
        .unwrap()
}

fn executor_in(dir: &Path) -> CodeExecutor {
    CodeExecutor::new(&config_for(dir)).unwrap()
}

// ============================================================================
// Single-line commands
// ============================================================================

#[test]
fn echo_hello_succeeds() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result = executor.execute_cmd("echo hello");

    assert!(result.success);
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout, "hello");
    assert_eq!(result.stderr, "");
    assert!(result.error.is_none());
}

#[test]
fn silent_success_reports_sentinel() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result = executor.execute_cmd(": > emptyfile && rm emptyfile");

    assert!(result.success);
    assert_eq!(result.stdout, NO_OUTPUT_SENTINEL);
    assert!(!temp.path().join("emptyfile").exists());
}

#[test]
fn unknown_command_fails_with_explanation() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result = executor.execute_cmd("cmdrunner_definitely_not_a_command");

    assert!(!result.success);
    assert_ne!(result.exit_code, 0);
    assert!(result.stderr.to_lowercase().contains("not found"));
}

#[test]
fn nonzero_exit_keeps_both_streams() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result = executor.execute_cmd("echo out; echo err >&2; exit 3");

    assert!(!result.success);
    assert_eq!(result.exit_code, 3);
    assert_eq!(result.stdout, "out");
    assert_eq!(result.stderr, "err");
    assert!(result.failure.is_none());
}

#[test]
fn commands_run_in_work_dir() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result = executor.execute_cmd("pwd");

    let expected = temp.path().canonicalize().unwrap();
    let reported = Path::new(&result.stdout).canonicalize().unwrap();
    assert_eq!(reported, expected);
}

#[test]
fn single_line_creates_no_scratch_artifacts() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    executor.execute_cmd("\n\necho one line\r\n");

    assert!(!temp.path().join("tempCodeRunner.sh").exists());
    assert!(!temp.path().join("tempCodeRunner.txt").exists());
}

#[test]
fn invalid_utf8_output_is_replaced_not_fatal() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result = executor.execute_cmd(r"printf 'ok \377\n'");

    assert!(result.success);
    assert_eq!(result.stdout, "ok \u{FFFD}");
}

#[test]
fn legacy_encoding_decodes_output() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .work_dir(temp.path())
        .encoding("windows-1254")
        .mirror(false)
        .build()
        .unwrap();
    let mut executor = CodeExecutor::new(&config).unwrap();

    // 0xF0 is 'ğ' in windows-1254
    let result = executor.execute_cmd(r"printf '\360'");

    assert_eq!(result.stdout, "ğ");
}

// ============================================================================
// Multi-line commands
// ============================================================================

#[test]
fn multi_line_script_runs_as_unit() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let script = "x=1\nif [ \"$x\" = 1 ]; then\n  echo branch taken\nfi\necho done";
    let result = executor.execute_cmd(script);

    assert!(result.success, "{result:?}");
    assert_eq!(result.stdout, "branch taken\ndone");
    assert_eq!(result.command, script);

    let script_path = temp.path().join("tempCodeRunner.sh");
    assert_eq!(fs::read_to_string(script_path).unwrap(), format!("{script}\n"));
    assert!(temp.path().join("tempCodeRunner.txt").exists());
}

#[test]
fn multi_line_stderr_is_folded_into_capture() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result = executor.execute_cmd("echo to stdout\necho to stderr >&2");

    assert_eq!(result.stderr, "");
    assert!(result.stdout.contains("to stdout"));
    assert!(result.stdout.contains("to stderr"));
}

#[test]
fn multi_line_artifacts_are_overwritten_per_run() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    executor.execute_cmd("echo first\necho run");
    let second = executor.execute_cmd("echo second\necho run");

    assert_eq!(second.stdout, "second\nrun");
    let script = fs::read_to_string(temp.path().join("tempCodeRunner.sh")).unwrap();
    assert!(!script.contains("first"));
}

#[test]
fn multi_line_silent_script_reports_sentinel() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result = executor.execute_cmd("true\ntrue");

    assert!(result.success);
    assert_eq!(result.stdout, NO_OUTPUT_SENTINEL);
}

// ============================================================================
// Failures captured into the result
// ============================================================================

#[test]
fn timeout_is_reported_and_bounded() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let started = Instant::now();
    let result =
        executor.execute(ExecutionRequest::new("sleep 30").with_timeout(Duration::from_secs(1)));
    let elapsed = started.elapsed();

    assert!(!result.success);
    assert_eq!(result.exit_code, -1);
    assert_eq!(result.stderr, TIMEOUT_STDERR);
    assert_eq!(result.failure, Some(FailureKind::TimeoutExceeded));
    assert!(result.error.unwrap().contains("1 seconds"));
    assert!(elapsed < Duration::from_secs(10), "took {elapsed:?}");
}

#[test]
fn sub_second_timeout_is_reported_with_fraction() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result =
        executor.execute(ExecutionRequest::new("sleep 5").with_timeout(Duration::from_millis(500)));

    assert_eq!(result.failure, Some(FailureKind::TimeoutExceeded));
    assert_eq!(
        result.error.as_deref(),
        Some("command did not finish within 0.5 seconds")
    );
}

#[test]
fn multi_line_timeout_is_reported() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let result = executor.execute(
        ExecutionRequest::new("echo start\nsleep 30").with_timeout(Duration::from_secs(1)),
    );

    assert_eq!(result.failure, Some(FailureKind::TimeoutExceeded));
}

#[test]
fn missing_shell_is_spawn_failure() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .work_dir(temp.path())
        .shell("/nonexistent/cmdrunner-shell")
        .mirror(false)
        .build()
        .unwrap();
    let mut executor = CodeExecutor::new(&config).unwrap();

    let result = executor.execute_cmd("echo hi");

    assert!(!result.success);
    assert_eq!(result.failure, Some(FailureKind::SpawnFailure));
    assert!(!result.stderr.is_empty());
    assert!(result.error.unwrap().starts_with("command failed to start: "));
}

#[test]
fn executor_survives_failures() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    executor.execute(ExecutionRequest::new("sleep 5").with_timeout(Duration::from_secs(1)));
    let after = executor.execute_cmd("echo still alive");

    assert!(after.success);
    assert_eq!(after.stdout, "still alive");
}

// ============================================================================
// Session log
// ============================================================================

#[test]
fn session_log_records_last_command() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    let log_dir = temp.path().join("logs").join("cmd_runner_logs");
    assert!(executor.log_path().starts_with(&log_dir));
    let name = executor
        .log_path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    assert!(name.starts_with("cmd_runner_logs_"));
    assert!(name.ends_with(".log"));
    assert_eq!(name.len(), "cmd_runner_logs_YYYYMMDD_HHMMSS.log".len());

    executor.execute_cmd("echo first");
    executor.execute_cmd("echo second; echo oops >&2");

    let content = fs::read_to_string(executor.log_path()).unwrap();
    assert!(content.starts_with(RESET_SENTINEL));
    assert!(!content.contains("first"));
    assert!(content.contains(" - INFO - COMMAND: echo second; echo oops >&2"));
    assert!(content.contains(" - INFO - STDOUT : second"));
    assert!(content.contains(" - WARNING - STDERR : oops"));
}

#[test]
fn timeout_is_logged_as_error() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());

    executor.execute(ExecutionRequest::new("sleep 5").with_timeout(Duration::from_secs(1)));

    let content = fs::read_to_string(executor.log_path()).unwrap();
    assert!(content.contains(" - ERROR - command did not finish within 1 seconds"));
}

#[test]
fn close_twice_is_harmless() {
    let temp = TempDir::new().unwrap();
    let mut executor = executor_in(temp.path());
    executor.execute_cmd("echo bye");

    executor.close();
    let first = fs::read_to_string(executor.log_path()).unwrap();
    executor.close();
    let second = fs::read_to_string(executor.log_path()).unwrap();

    assert_eq!(first, second);
    assert!(first.contains("STDOUT : bye"));
}

#[test]
fn unwritable_log_directory_fails_construction() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("logs"), "blocking file").unwrap();

    assert!(CodeExecutor::new(&config_for(temp.path())).is_err());
}
