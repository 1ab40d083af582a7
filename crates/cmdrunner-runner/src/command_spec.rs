use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::process::Command as TokioCommand;

// ============================================================================
// CommandSpec - Process Invocation Specification
// ============================================================================

/// Specification for a process to spawn.
///
/// Every shell invocation goes through this type so the program, its argv,
/// working directory and environment are assembled in one place. The shell
/// command string itself is a single argument; it is never concatenated with
/// the program name.
///
/// # Example
///
/// ```rust
/// use cmdrunner_runner::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("sh")
///     .arg("-c")
///     .arg("echo hello")
///     .cwd("/tmp");
///
/// assert_eq!(cmd.program, OsString::from("sh"));
/// assert_eq!(cmd.args.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements
    pub args: Vec<OsString>,
    /// Optional working directory
    pub cwd: Option<PathBuf>,
    /// Optional environment overrides
    pub env: Option<HashMap<OsString, OsString>>,
    /// Pass arguments to the program without re-quoting.
    ///
    /// Only meaningful on Windows, where `cmd.exe` parses its own command line
    /// and MSVC-style quoting would corrupt the command string.
    pub verbatim_args: bool,
}

impl CommandSpec {
    /// Create a new `CommandSpec` with the given program.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: None,
            verbatim_args: false,
        }
    }

    /// Add a single argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the command.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set an environment variable for the command.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Mark the arguments as pre-quoted for the target program.
    #[must_use]
    pub const fn verbatim(mut self, verbatim: bool) -> Self {
        self.verbatim_args = verbatim;
        self
    }

    /// Program name for diagnostics.
    #[must_use]
    pub fn program_lossy(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Convert this `CommandSpec` into a `tokio::process::Command`.
    ///
    /// Stdio configuration is left to the caller.
    #[must_use]
    pub fn to_tokio_command(&self) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);

        #[cfg(windows)]
        {
            if self.verbatim_args {
                for arg in &self.args {
                    cmd.raw_arg(arg);
                }
            } else {
                cmd.args(&self.args);
            }
        }

        #[cfg(not(windows))]
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        if let Some(ref env) = self.env {
            for (key, value) in env {
                cmd.env(key, value);
            }
        }

        cmd
    }
}
