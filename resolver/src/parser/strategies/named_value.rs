//! `--name value` style flags.

use plugin_shell_core::{CommandMetadata, OptionKind};
use tracing::debug;

use super::{Claim, OptionParser};
use crate::parser::{ParsedOptions, RawValue, TokenCursor, is_flag_shaped};

/// Claims a flag and the single value token after it.
///
/// A flag at the end of input, or followed by another flag, is consumed on
/// its own and leaves the option unset.
pub struct NamedValueParser;

impl OptionParser for NamedValueParser {
    fn name(&self) -> &'static str {
        "named-value"
    }

    fn try_claim(
        &self,
        command: &CommandMetadata,
        cursor: &TokenCursor<'_>,
        _parsed: &ParsedOptions,
    ) -> Option<Claim> {
        let flag = cursor.peek().filter(|token| is_flag_shaped(token))?;
        let option = command
            .find_named(flag)
            .filter(|o| o.kind == OptionKind::NamedValue)?;

        match cursor.remaining().get(1) {
            Some(value) if !is_flag_shaped(value) => Some(Claim::value(
                2,
                option.index,
                RawValue::Single(value.clone()),
            )),
            _ => {
                debug!(flag, "flag given without a value");
                Some(Claim::consumed(1))
            }
        }
    }
}
