//! Scratch script and capture file for multi-line commands
//!
//! A multi-line command is written to `tempCodeRunner.<sh|bat>` and run as a
//! unit, with both output streams appended to `tempCodeRunner.txt`. Both files
//! live in the working directory and are overwritten on every multi-line run;
//! nothing removes them after a crash.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use cmdrunner_runner::{DecodedText, OutputEncoding, Shell};
use cmdrunner_utils::error::ArtifactError;
use cmdrunner_utils::paths;

/// Paths of the scratch script and its output capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchArtifacts {
    script: PathBuf,
    capture: PathBuf,
}

impl ScratchArtifacts {
    /// Artifact paths for `shell`'s dialect under `work_dir`.
    #[must_use]
    pub fn for_shell(work_dir: &Path, shell: &Shell) -> Self {
        Self {
            script: paths::scratch_script_path(work_dir, shell.kind.script_extension()),
            capture: paths::scratch_capture_path(work_dir),
        }
    }

    #[must_use]
    pub fn script(&self) -> &Path {
        &self.script
    }

    #[must_use]
    pub fn capture(&self) -> &Path {
        &self.capture
    }

    /// Write the script and an empty capture file, then return the wrapped
    /// command that runs the script with output redirected to the capture.
    pub fn materialize(
        &self,
        command: &str,
        shell: &Shell,
        encoding: OutputEncoding,
    ) -> Result<String, ArtifactError> {
        let body = encoding.encode(&format!("{command}\n"));
        fs::write(&self.script, body).map_err(|source| ArtifactError::Write {
            path: self.script.clone(),
            source,
        })?;
        fs::write(&self.capture, b"").map_err(|source| ArtifactError::Write {
            path: self.capture.clone(),
            source,
        })?;

        let wrapped = shell.script_invocation(&self.script, &self.capture);
        debug!(script = %self.script.display(), wrapped = %wrapped, "scratch script written");
        Ok(wrapped)
    }

    /// Read back whatever the script wrote to the capture file.
    pub fn read_capture(&self, encoding: OutputEncoding) -> Result<DecodedText, ArtifactError> {
        match fs::read(&self.capture) {
            Ok(bytes) => Ok(encoding.decode(&bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ArtifactError::CaptureMissing {
                path: self.capture.clone(),
            }),
            Err(source) => Err(ArtifactError::Read {
                path: self.capture.clone(),
                source,
            }),
        }
    }
}
