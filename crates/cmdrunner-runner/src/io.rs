use std::io;
use std::process::ExitStatus;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout};

#[derive(Debug)]
pub(crate) enum PipeReadError {
    Stdout(io::Error),
    Stderr(io::Error),
    Wait(io::Error),
}

/// Drain both pipes to EOF concurrently, then reap the child.
///
/// Bytes read so far stay in the buffers if the future is dropped early.
pub(crate) async fn read_pipes_until_exit(
    child: &mut Child,
    stdout_pipe: &mut ChildStdout,
    stderr_pipe: &mut ChildStderr,
    stdout_buffer: &mut Vec<u8>,
    stderr_buffer: &mut Vec<u8>,
) -> Result<ExitStatus, PipeReadError> {
    let stdout_read = async {
        stdout_pipe
            .read_to_end(stdout_buffer)
            .await
            .map_err(PipeReadError::Stdout)
    };
    let stderr_read = async {
        stderr_pipe
            .read_to_end(stderr_buffer)
            .await
            .map_err(PipeReadError::Stderr)
    };
    tokio::try_join!(stdout_read, stderr_read)?;

    child.wait().await.map_err(PipeReadError::Wait)
}
