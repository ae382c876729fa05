//! Trailing positional sequences.

use plugin_shell_core::{CommandMetadata, OptionKind};

use super::{Claim, OptionParser};
use crate::parser::{ParsedOptions, RawValue, TokenCursor};

/// Gives every remaining token to the positional vararg option, flags
/// included, whatever the first token looks like.
pub struct OrderedVarargsParser;

impl OptionParser for OrderedVarargsParser {
    fn name(&self) -> &'static str {
        "ordered-varargs"
    }

    fn try_claim(
        &self,
        command: &CommandMetadata,
        cursor: &TokenCursor<'_>,
        parsed: &ParsedOptions,
    ) -> Option<Claim> {
        cursor.peek()?;
        let option = command
            .ordered_options()
            .into_iter()
            .find(|o| o.kind == OptionKind::OrderedVarargs && !parsed.contains(o.index))?;

        let values = cursor.remaining().to_vec();
        Some(Claim::value(
            values.len(),
            option.index,
            RawValue::Many(values),
        ))
    }
}
