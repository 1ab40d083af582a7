/// A command with boundary line breaks removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCommand {
    pub command: String,
    /// The cleaned command still contains a `\n`.
    pub multi_line: bool,
}

/// Strip leading and trailing `\n` / `\r` and classify the result.
///
/// Everything else, including leading or trailing spaces, is left untouched;
/// the command is handed to the shell as-is.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedCommand {
    let command = raw.trim_matches(['\n', '\r']);
    NormalizedCommand {
        command: command.to_string(),
        multi_line: command.contains('\n'),
    }
}
