//! Tests for process-group termination on timeout
//!
//! A command that backgrounds long-running children must leave nothing
//! behind once its deadline fires: the shell is reaped by the runner and every
//! member of its process group receives SIGTERM, then SIGKILL.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use cmdrunner::{CodeExecutor, CommandSpec, Config, ExecutionRequest, FailureKind, ProcessRunner, RunnerError, ShellRunner};
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// True while `pid` exists. Orphans are reaped by init, so poll briefly.
fn wait_until_gone(pid: i32, within: Duration) -> bool {
    let deadline = Instant::now() + within;
    loop {
        if kill(Pid::from_raw(pid), None) == Err(Errno::ESRCH) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

fn read_pid(path: &Path) -> i32 {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(text) = fs::read_to_string(path)
            && let Ok(pid) = text.trim().parse()
        {
            return pid;
        }
        assert!(Instant::now() < deadline, "pid file {} never written", path.display());
        thread::sleep(Duration::from_millis(20));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn timeout_kills_backgrounded_children() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .work_dir(temp.path())
        .kill_grace(Duration::from_millis(300))
        .mirror(false)
        .build()
        .unwrap();
    let mut executor = CodeExecutor::new(&config).unwrap();

    let command = "echo $$ > shell.pid; sleep 60 & echo $! > child.pid; sleep 60 & wait";
    let result = executor.execute(ExecutionRequest::new(command).with_timeout(Duration::from_secs(1)));

    assert_eq!(result.failure, Some(FailureKind::TimeoutExceeded));

    let shell_pid = read_pid(&temp.path().join("shell.pid"));
    let child_pid = read_pid(&temp.path().join("child.pid"));
    assert!(wait_until_gone(shell_pid, Duration::from_secs(5)), "shell {shell_pid} survived");
    assert!(wait_until_gone(child_pid, Duration::from_secs(5)), "child {child_pid} survived");
}

#[test]
fn term_ignoring_process_is_killed_after_grace() {
    let temp = TempDir::new().unwrap();
    let runner = ShellRunner::new()
        .unwrap()
        .with_kill_grace(Duration::from_millis(200));

    let spec = CommandSpec::new("sh")
        .arg("-c")
        .arg("trap '' TERM; echo $$ > stubborn.pid; while :; do sleep 1; done")
        .cwd(temp.path());

    let started = Instant::now();
    let err = runner.run(&spec, Duration::from_millis(500)).unwrap_err();

    assert!(matches!(err, RunnerError::Timeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(10));

    let pid = read_pid(&temp.path().join("stubborn.pid"));
    assert!(wait_until_gone(pid, Duration::from_secs(5)), "stubborn {pid} survived");
}

#[test]
fn fast_command_is_not_affected_by_deadline() {
    let temp = TempDir::new().unwrap();
    let runner = ShellRunner::new().unwrap();
    let spec = CommandSpec::new("sh").arg("-c").arg("echo quick").cwd(temp.path());

    let output = runner.run(&spec, Duration::from_secs(5)).unwrap();

    assert!(output.success());
    assert_eq!(output.stdout, b"quick\n");
    assert!(output.elapsed < Duration::from_secs(5));
}
