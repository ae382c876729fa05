//! Error types raised while resolving a command line.

use thiserror::Error;

use crate::parser::ParseError;
use crate::shell::ShellError;
use crate::tokenizer::TokenizeError;

/// A plugin matched but no command could be selected.
///
/// Raised when the token after the plugin name names none of its commands
/// and the plugin declares no default command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing command for plugin [{plugin}], available commands: [{}]", available.join(", "))]
pub struct CommandResolutionError {
    /// Name of the resolved plugin.
    pub plugin: String,
    /// Command names the plugin declares, in declaration order.
    pub available: Vec<String>,
}

/// Errors that abort resolution of one line.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The line could not be split into tokens.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// Plugin found, command not.
    #[error(transparent)]
    CommandResolution(#[from] CommandResolutionError),

    /// Tokens matched no declared option (strict parsing only).
    #[error("could not parse {}", describe_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// The shell failed while prompting.
    #[error(transparent)]
    Shell(#[from] ShellError),
}

fn describe_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`ResolutionError`].
pub type Result<T> = std::result::Result<T, ResolutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_resolution_message_lists_commands() {
        let err = CommandResolutionError {
            plugin: "project".to_string(),
            available: vec!["create".to_string(), "delete".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing command for plugin [project], available commands: [create, delete]"
        );
    }

    #[test]
    fn test_parse_error_message_joins_tokens() {
        let err = ResolutionError::Parse(vec![
            ParseError::new(0, "--bogus"),
            ParseError::new(3, "extra"),
        ]);
        assert_eq!(
            err.to_string(),
            "could not parse unrecognized token [--bogus] at position 0; unrecognized token [extra] at position 3"
        );
    }
}
