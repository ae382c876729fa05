//! Splitting a raw input line into tokens.
//!
//! Only token order and count matter downstream; quoting rules belong to the
//! [`Tokenizer`] implementation.

use thiserror::Error;

/// The line could not be tokenized (e.g. an unterminated quote).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not tokenize input: {0}")]
pub struct TokenizeError(pub String);

/// Splits a raw line into an ordered sequence of tokens.
///
/// An empty or whitespace-only line must yield no tokens.
pub trait Tokenizer {
    fn tokenize(&self, line: &str) -> Result<Vec<String>, TokenizeError>;
}

/// POSIX-shell style tokenizer backed by the `shell-words` crate.
///
/// # Examples
///
/// ```
/// use plugin_shell_resolver::{ShellWordsTokenizer, Tokenizer};
///
/// let tokens = ShellWordsTokenizer.tokenize(r#"project create --name "my app""#).unwrap();
/// assert_eq!(tokens, vec!["project", "create", "--name", "my app"]);
/// assert!(ShellWordsTokenizer.tokenize("   ").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellWordsTokenizer;

impl Tokenizer for ShellWordsTokenizer {
    fn tokenize(&self, line: &str) -> Result<Vec<String>, TokenizeError> {
        shell_words::split(line).map_err(|err| TokenizeError(err.to_string()))
    }
}
