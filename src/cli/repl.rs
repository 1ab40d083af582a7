//! Interactive prompt loop

use std::io::{self, BufRead, Write};

use cmdrunner_config::Config;
use cmdrunner_engine::CodeExecutor;
use cmdrunner_runner::ProcessRunner;

use super::commands::{open_executor, render_result};
use crate::ExitCode;

pub const PROMPT: &str = "cmdrunner> ";

/// One line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplInput<'a> {
    /// `exit` / `quit`, any case
    Quit,
    /// `test`, any case
    SelfTest,
    /// Blank line
    Empty,
    Command(&'a str),
}

impl<'a> ReplInput<'a> {
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\n', '\r']);
        let keyword = line.trim();
        if keyword.is_empty() {
            Self::Empty
        } else if keyword.eq_ignore_ascii_case("exit") || keyword.eq_ignore_ascii_case("quit") {
            Self::Quit
        } else if keyword.eq_ignore_ascii_case("test") {
            Self::SelfTest
        } else {
            Self::Command(line)
        }
    }
}

pub(super) fn run_repl(config: &Config) -> Result<(), ExitCode> {
    let mut executor = open_executor(config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = repl_loop(&mut executor, stdin.lock(), stdout.lock());
    executor.close();

    outcome.map_err(|err| {
        eprintln!("✗ Console I/O failed: {err}");
        ExitCode::IO_FAILURE
    })
}

/// Read commands from `input` until `exit`, `quit` or end of input.
///
/// The executor is closed before returning.
pub fn repl_loop<R, I, O>(executor: &mut CodeExecutor<R>, mut input: I, mut output: O) -> io::Result<()>
where
    R: ProcessRunner,
    I: BufRead,
    O: Write,
{
    writeln!(
        output,
        "cmdrunner {} - shell command executor",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(output, "Working directory: {}", executor.work_dir().display())?;
    writeln!(output, "Session log: {}", executor.log_path().display())?;
    writeln!(
        output,
        "Type 'exit' or 'quit' to leave, 'test' to run the self-test."
    )?;

    let mut line = String::new();
    loop {
        write!(output, "\n{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        match ReplInput::parse(&line) {
            ReplInput::Quit => break,
            ReplInput::Empty => {}
            ReplInput::SelfTest => {
                let report = executor.self_test();
                writeln!(output, "{report}")?;
            }
            ReplInput::Command(command) => {
                let result = executor.execute_cmd(command);
                write!(output, "{}", render_result(&result))?;
            }
        }
    }

    writeln!(output, "Closing session. Goodbye!")?;
    executor.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdrunner_runner::{CommandSpec, ProcessOutput, RunnerError};
    use std::io::Cursor;
    use std::time::Duration;

    /// Echoes the shell argument back on stdout.
    #[derive(Debug)]
    struct EchoRunner;

    impl ProcessRunner for EchoRunner {
        fn run(&self, cmd: &CommandSpec, _timeout: Duration) -> Result<ProcessOutput, RunnerError> {
            let text = cmd
                .args
                .last()
                .map(|arg| arg.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(ProcessOutput::new(text.into_bytes(), Vec::new(), Some(0), Duration::ZERO))
        }
    }

    fn executor(dir: &std::path::Path) -> CodeExecutor<EchoRunner> {
        let config = Config::builder()
            .work_dir(dir)
            .mirror(false)
            .build()
            .unwrap();
        CodeExecutor::with_runner(&config, EchoRunner).unwrap()
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(ReplInput::parse("EXIT\n"), ReplInput::Quit);
        assert_eq!(ReplInput::parse(" quit \r\n"), ReplInput::Quit);
        assert_eq!(ReplInput::parse("Test"), ReplInput::SelfTest);
        assert_eq!(ReplInput::parse("   \n"), ReplInput::Empty);
        assert_eq!(
            ReplInput::parse("  echo exit\n"),
            ReplInput::Command("  echo exit")
        );
    }

    #[test]
    fn test_loop_runs_commands_until_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        let input = Cursor::new("echo hi\n\nquit\necho never\n");
        let mut output = Vec::new();

        repl_loop(&mut executor, input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Working directory: "));
        assert!(text.contains("OUTPUT:\necho hi\n"));
        assert!(!text.contains("echo never"));
        assert!(text.ends_with("Closing session. Goodbye!\n"));
        assert!(executor.is_closed());
    }

    #[test]
    fn test_end_of_input_closes_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        let mut output = Vec::new();

        repl_loop(&mut executor, Cursor::new(""), &mut output).unwrap();
        assert!(executor.is_closed());
    }
}
