use crate::error::RunnerError;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::debug;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows_job;

/// Everything a spawned shell may fork, grouped so it can be killed as a unit.
///
/// Unix: the shell leads a fresh process group. Windows: the shell is assigned
/// to a Job Object configured with kill-on-close.
pub(crate) struct ProcessTree {
    #[cfg(windows)]
    job: windows_job::JobObjectHandle,
}

impl ProcessTree {
    /// Configure `command` so its descendants can be terminated together.
    pub(crate) fn prepare(command: &mut Command) -> Result<Self, RunnerError> {
        #[cfg(unix)]
        {
            command.process_group(0);
            Ok(Self {})
        }

        #[cfg(windows)]
        {
            let _ = command;
            Ok(Self {
                job: windows_job::create_job_object()?,
            })
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = command;
            Ok(Self {})
        }
    }

    /// Attach a freshly spawned child to the tree.
    pub(crate) fn adopt(&self, child: &Child) -> Result<(), RunnerError> {
        #[cfg(windows)]
        {
            windows_job::assign_to_job(&self.job, child)
        }

        #[cfg(not(windows))]
        {
            let _ = child;
            Ok(())
        }
    }

    /// Terminate the tree and reap the direct child.
    ///
    /// Returns once the child has been waited on, so no zombie outlives the call.
    pub(crate) async fn terminate(&self, child: &mut Child, grace: Duration) {
        #[cfg(unix)]
        unix::terminate_process_group(child, grace).await;

        #[cfg(windows)]
        {
            let _ = grace;
            windows_job::terminate_job(&self.job);
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = grace;
            let _ = child.start_kill();
        }

        match child.wait().await {
            Ok(status) => debug!(?status, "terminated process reaped"),
            Err(err) => debug!(error = %err, "failed to reap terminated process"),
        }
    }
}
