use crate::error::RunnerError;

/// RAII wrapper for Windows Job Object handle
///
/// Closing the handle terminates every process in the job
/// (`JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE`).
pub(crate) struct JobObjectHandle {
    handle: windows::Win32::Foundation::HANDLE,
}

// SAFETY: Windows HANDLEs are opaque kernel object references usable from any thread.
unsafe impl Send for JobObjectHandle {}
unsafe impl Sync for JobObjectHandle {}

impl Drop for JobObjectHandle {
    fn drop(&mut self) {
        use windows::Win32::Foundation::CloseHandle;
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

/// Create a Job Object configured to kill all members when closed.
pub(crate) fn create_job_object() -> Result<JobObjectHandle, RunnerError> {
    use windows::Win32::System::JobObjects::{
        CreateJobObjectW, JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE, JOBOBJECT_EXTENDED_LIMIT_INFORMATION,
        JobObjectExtendedLimitInformation, SetInformationJobObject,
    };

    unsafe {
        let job = CreateJobObjectW(None, None).map_err(|e| RunnerError::ProcessTreeFailed {
            reason: format!("Failed to create Job Object: {e}"),
        })?;
        let job = JobObjectHandle { handle: job };

        let mut info: JOBOBJECT_EXTENDED_LIMIT_INFORMATION = std::mem::zeroed();
        info.BasicLimitInformation.LimitFlags = JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE;

        SetInformationJobObject(
            job.handle,
            JobObjectExtendedLimitInformation,
            (&raw const info).cast(),
            std::mem::size_of::<JOBOBJECT_EXTENDED_LIMIT_INFORMATION>() as u32,
        )
        .map_err(|e| RunnerError::ProcessTreeFailed {
            reason: format!("Failed to configure Job Object: {e}"),
        })?;

        Ok(job)
    }
}

/// Assign the child (and, from now on, its descendants) to the job.
pub(crate) fn assign_to_job(
    job: &JobObjectHandle,
    child: &tokio::process::Child,
) -> Result<(), RunnerError> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::JobObjects::AssignProcessToJobObject;
    use windows::Win32::System::Threading::{OpenProcess, PROCESS_ALL_ACCESS};

    if let Some(pid) = child.id() {
        unsafe {
            let process_handle = OpenProcess(PROCESS_ALL_ACCESS, false, pid).map_err(|e| {
                RunnerError::ProcessTreeFailed {
                    reason: format!("Failed to open process for job assignment: {e}"),
                }
            })?;

            let assigned = AssignProcessToJobObject(job.handle, process_handle);
            let _ = CloseHandle(process_handle);
            assigned.map_err(|e| RunnerError::ProcessTreeFailed {
                reason: format!("Failed to assign process to Job Object: {e}"),
            })?;
        }
    }

    Ok(())
}

/// Kill every process in the job immediately.
pub(crate) fn terminate_job(job: &JobObjectHandle) {
    use windows::Win32::System::JobObjects::TerminateJobObject;

    unsafe {
        let _ = TerminateJobObject(job.handle, 1);
    }
}
