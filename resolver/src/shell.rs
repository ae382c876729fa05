//! Blocking prompt and print primitives used during parameter completion.
//!
//! The resolver never touches the terminal directly; it is handed a
//! [`Shell`]. [`StdioShell`] talks to any line-oriented reader/writer pair,
//! and [`ScriptedShell`] replays canned answers while recording every call.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use plugin_shell_core::PromptType;
use thiserror::Error;

/// Failures raised by a [`Shell`].
#[derive(Debug, Error)]
pub enum ShellError {
    /// Reading or writing the terminal failed.
    #[error("shell I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input ended before an answer was given.
    #[error("input closed while prompting")]
    Closed,
}

/// Prompt/print capability handed to the resolver.
///
/// Each method is a single blocking call; implementations must not retry or
/// validate. Looping over empty answers is the caller's job.
pub trait Shell {
    /// Prints one line of output.
    fn println(&mut self, text: &str) -> Result<(), ShellError>;

    /// Asks for free text.
    fn prompt(&mut self, label: &str) -> Result<String, ShellError>;

    /// Asks a yes/no question.
    fn prompt_boolean(&mut self, label: &str) -> Result<bool, ShellError>;

    /// Asks for a filesystem path.
    fn prompt_file(&mut self, label: &str) -> Result<PathBuf, ShellError>;

    /// Asks for a value expected to match `prompt_type`.
    fn prompt_common(&mut self, label: &str, prompt_type: &PromptType)
    -> Result<String, ShellError>;
}

/// Interprets a yes/no answer: `y`, `yes` and `true` (any case) mean yes.
pub fn parse_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "true"
    )
}

/// Line-oriented shell over a reader and a writer.
///
/// # Examples
///
/// ```
/// use plugin_shell_resolver::{Shell, StdioShell};
///
/// let input = b"my-app\ny\n" as &[u8];
/// let mut shell = StdioShell::new(input, Vec::new());
///
/// assert_eq!(shell.prompt("name: ").unwrap(), "my-app");
/// assert!(shell.prompt_boolean("force: ").unwrap());
///
/// let output = String::from_utf8(shell.into_writer()).unwrap();
/// assert_eq!(output, "name: force: [y/N] ");
/// ```
#[derive(Debug)]
pub struct StdioShell<R, W> {
    reader: R,
    writer: W,
}

impl StdioShell<io::StdinLock<'static>, io::Stdout> {
    /// Shell bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdioShell<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consumes the shell, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Reads one line after printing `label`, without its line terminator.
    pub fn read_line(&mut self, label: &str) -> Result<String, ShellError> {
        self.writer.write_all(label.as_bytes())?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ShellError::Closed);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }
}

impl<R: BufRead, W: Write> Shell for StdioShell<R, W> {
    fn println(&mut self, text: &str) -> Result<(), ShellError> {
        writeln!(self.writer, "{text}")?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<String, ShellError> {
        self.read_line(label)
    }

    fn prompt_boolean(&mut self, label: &str) -> Result<bool, ShellError> {
        let answer = self.read_line(&format!("{label}[y/N] "))?;
        Ok(parse_yes(&answer))
    }

    fn prompt_file(&mut self, label: &str) -> Result<PathBuf, ShellError> {
        let answer = self.read_line(label)?;
        Ok(PathBuf::from(answer.trim()))
    }

    fn prompt_common(
        &mut self,
        label: &str,
        _prompt_type: &PromptType,
    ) -> Result<String, ShellError> {
        self.read_line(label)
    }
}

/// One recorded call made against a [`ScriptedShell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCall {
    Prompt(String),
    PromptBoolean(String),
    PromptFile(String),
    PromptCommon(String, PromptType),
}

/// Shell that replays queued answers and records everything.
///
/// Boolean prompts interpret their answer with [`parse_yes`]; file prompts
/// turn it into a path. Running out of answers yields [`ShellError::Closed`].
///
/// # Examples
///
/// ```
/// use plugin_shell_core::PromptType;
/// use plugin_shell_resolver::{ScriptedShell, Shell, ShellCall};
///
/// let mut shell = ScriptedShell::new(["42"]);
/// assert_eq!(shell.prompt_common("count: ", &PromptType::Number).unwrap(), "42");
/// assert!(shell.prompt("again: ").is_err());
/// assert_eq!(
///     shell.calls()[0],
///     ShellCall::PromptCommon("count: ".into(), PromptType::Number)
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedShell {
    answers: VecDeque<String>,
    calls: Vec<ShellCall>,
    printed: Vec<String>,
}

impl ScriptedShell {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            calls: Vec::new(),
            printed: Vec::new(),
        }
    }

    /// Every prompt made so far, in order.
    pub fn calls(&self) -> &[ShellCall] {
        &self.calls
    }

    /// Every line printed so far, in order.
    pub fn printed(&self) -> &[String] {
        &self.printed
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, call: ShellCall) -> Result<String, ShellError> {
        self.calls.push(call);
        self.answers.pop_front().ok_or(ShellError::Closed)
    }
}

impl Shell for ScriptedShell {
    fn println(&mut self, text: &str) -> Result<(), ShellError> {
        self.printed.push(text.to_string());
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<String, ShellError> {
        self.next_answer(ShellCall::Prompt(label.to_string()))
    }

    fn prompt_boolean(&mut self, label: &str) -> Result<bool, ShellError> {
        let answer = self.next_answer(ShellCall::PromptBoolean(label.to_string()))?;
        Ok(parse_yes(&answer))
    }

    fn prompt_file(&mut self, label: &str) -> Result<PathBuf, ShellError> {
        let answer = self.next_answer(ShellCall::PromptFile(label.to_string()))?;
        Ok(PathBuf::from(answer.trim()))
    }

    fn prompt_common(
        &mut self,
        label: &str,
        prompt_type: &PromptType,
    ) -> Result<String, ShellError> {
        self.next_answer(ShellCall::PromptCommon(
            label.to_string(),
            prompt_type.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes() {
        assert!(parse_yes("y"));
        assert!(parse_yes(" YES "));
        assert!(parse_yes("True"));
        assert!(!parse_yes(""));
        assert!(!parse_yes("no"));
        assert!(!parse_yes("yep"));
    }

    #[test]
    fn test_stdio_shell_strips_line_endings() {
        let mut shell = StdioShell::new(b"value\r\n  spaced  \n" as &[u8], Vec::new());
        assert_eq!(shell.prompt("a: ").unwrap(), "value");
        assert_eq!(shell.prompt("b: ").unwrap(), "  spaced  ");
    }

    #[test]
    fn test_stdio_shell_reports_closed_input() {
        let mut shell = StdioShell::new(b"" as &[u8], Vec::new());
        assert!(matches!(shell.prompt("a: "), Err(ShellError::Closed)));
    }

    #[test]
    fn test_stdio_shell_file_prompt_trims() {
        let mut shell = StdioShell::new(b"  src/lib.rs \n\n" as &[u8], Vec::new());
        assert_eq!(
            shell.prompt_file("path: ").unwrap(),
            PathBuf::from("src/lib.rs")
        );
        assert_eq!(shell.prompt_file("path: ").unwrap(), PathBuf::new());
    }

    #[test]
    fn test_stdio_shell_println_writes_line() {
        let mut shell = StdioShell::new(b"" as &[u8], Vec::new());
        shell.println("hello").unwrap();
        assert_eq!(shell.into_writer(), b"hello\n");
    }

    #[test]
    fn test_scripted_shell_records_calls_and_output() {
        let mut shell = ScriptedShell::new(["yes", "out/dir"]);
        shell.println("note").unwrap();
        assert!(shell.prompt_boolean("force: ").unwrap());
        assert_eq!(
            shell.prompt_file("dir: ").unwrap(),
            PathBuf::from("out/dir")
        );

        assert_eq!(shell.printed(), ["note".to_string()]);
        assert_eq!(
            shell.calls(),
            [
                ShellCall::PromptBoolean("force: ".into()),
                ShellCall::PromptFile("dir: ".into()),
            ]
        );
        assert_eq!(shell.remaining(), 0);
    }
}
