use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use std::time::Duration;
use tokio::process::Child;
use tracing::debug;

/// SIGTERM the child's process group, give it `grace` to exit, then SIGKILL
/// whatever is left in the group.
pub(crate) async fn terminate_process_group(child: &mut Child, grace: Duration) {
    let Some(pid) = child.id() else {
        // Already reaped
        return;
    };
    let Ok(raw_pid) = i32::try_from(pid) else {
        let _ = child.start_kill();
        return;
    };
    let pgid = Pid::from_raw(raw_pid);

    if let Err(err) = killpg(pgid, Signal::SIGTERM) {
        debug!(pgid = raw_pid, error = %err, "SIGTERM to process group failed");
    }

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => debug!(pgid = raw_pid, ?status, "process group leader exited after SIGTERM"),
        Ok(Err(err)) => debug!(pgid = raw_pid, error = %err, "wait after SIGTERM failed"),
        Err(_) => debug!(pgid = raw_pid, grace_ms = grace.as_millis() as u64, "grace period elapsed"),
    }

    // Background jobs may have ignored SIGTERM or outlived the leader
    let _ = killpg(pgid, Signal::SIGKILL);
}
