//! Shell flavours understood by the runner

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;

use crate::CommandSpec;

/// Shell command-line dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellKind {
    /// POSIX `sh -c` semantics
    Posix,
    /// Windows `cmd /C` semantics
    Cmd,
}

impl ShellKind {
    /// The dialect native to the build target.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(windows) { Self::Cmd } else { Self::Posix }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::Cmd => "cmd",
        }
    }

    /// Interpreter used when no program override is configured.
    #[must_use]
    pub const fn default_program(&self) -> &'static str {
        match self {
            Self::Posix => "sh",
            Self::Cmd => "cmd",
        }
    }

    /// Flag that makes the interpreter run one command string and exit.
    #[must_use]
    pub const fn command_flag(&self) -> &'static str {
        match self {
            Self::Posix => "-c",
            Self::Cmd => "/C",
        }
    }

    /// File extension for scratch scripts in this dialect.
    #[must_use]
    pub const fn script_extension(&self) -> &'static str {
        match self {
            Self::Posix => "sh",
            Self::Cmd => "bat",
        }
    }

    /// Quote a filesystem path as a single shell word.
    #[must_use]
    pub fn quote_path(&self, path: &Path) -> String {
        let raw = path.to_string_lossy();
        match self {
            Self::Posix => format!("'{}'", raw.replace('\'', r"'\''")),
            // Windows paths cannot contain double quotes
            Self::Cmd => format!("\"{raw}\""),
        }
    }
}

impl std::fmt::Display for ShellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete shell: dialect plus interpreter program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    pub kind: ShellKind,
    pub program: OsString,
}

impl Shell {
    /// The host dialect with its default interpreter.
    #[must_use]
    pub fn host() -> Self {
        let kind = ShellKind::host();
        Self {
            kind,
            program: OsString::from(kind.default_program()),
        }
    }

    /// Same dialect, different interpreter (e.g. `bash` instead of `sh`).
    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Build the invocation that hands `command` to this shell as one opaque string.
    #[must_use]
    pub fn command_spec(&self, command: &str) -> CommandSpec {
        CommandSpec::new(self.program.clone())
            .arg(self.kind.command_flag())
            .arg(command)
            .verbatim(self.kind == ShellKind::Cmd)
    }

    /// Command string that runs `script` as a unit with both output streams
    /// appended to `capture`.
    #[must_use]
    pub fn script_invocation(&self, script: &Path, capture: &Path) -> String {
        let script = self.kind.quote_path(script);
        let capture = self.kind.quote_path(capture);
        match self.kind {
            ShellKind::Posix => {
                let program = self.program.to_string_lossy();
                format!("{program} {script} >> {capture} 2>&1")
            }
            ShellKind::Cmd => format!("call {script} >> {capture} 2>&1"),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::host()
    }
}
