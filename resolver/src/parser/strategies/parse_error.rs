//! Fallback for tokens no other strategy claims.

use plugin_shell_core::CommandMetadata;
use tracing::debug;

use super::{Claim, OptionParser};
use crate::parser::{ParseError, ParsedOptions, TokenCursor};

/// Records the next token as a [`ParseError`] instead of dropping it.
pub struct ParseErrorParser;

impl OptionParser for ParseErrorParser {
    fn name(&self) -> &'static str {
        "parse-error"
    }

    fn try_claim(
        &self,
        command: &CommandMetadata,
        cursor: &TokenCursor<'_>,
        _parsed: &ParsedOptions,
    ) -> Option<Claim> {
        let token = cursor.peek()?;
        debug!(command = %command.name, token, "token matches no option");
        Some(Claim::error(ParseError::new(cursor.position(), token)))
    }
}
