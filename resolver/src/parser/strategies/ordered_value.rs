//! Single positional values.

use plugin_shell_core::{CommandMetadata, OptionKind};

use super::{Claim, OptionParser};
use crate::parser::{ParsedOptions, RawValue, TokenCursor, is_flag_shaped};

/// Assigns the next token to the first positional single-value option that
/// has no value yet, in declaration order.
pub struct OrderedValueParser;

impl OptionParser for OrderedValueParser {
    fn name(&self) -> &'static str {
        "ordered-value"
    }

    fn try_claim(
        &self,
        command: &CommandMetadata,
        cursor: &TokenCursor<'_>,
        parsed: &ParsedOptions,
    ) -> Option<Claim> {
        let token = cursor.peek().filter(|token| !is_flag_shaped(token))?;
        let option = command
            .ordered_options()
            .into_iter()
            .find(|o| o.kind == OptionKind::OrderedValue && !parsed.contains(o.index))?;

        Some(Claim::value(
            1,
            option.index,
            RawValue::Single(token.to_string()),
        ))
    }
}
