//! `--force` style flags.

use plugin_shell_core::{CommandMetadata, OptionKind};

use super::{Claim, OptionParser};
use crate::parser::{ParsedOptions, RawValue, TokenCursor, is_flag_shaped};

/// Claims a flag bound to a boolean option and sets it to `"true"`.
pub struct NamedBooleanParser;

impl OptionParser for NamedBooleanParser {
    fn name(&self) -> &'static str {
        "named-boolean"
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
            .filter(|o| o.kind == OptionKind::NamedBoolean)?;

        Some(Claim::value(
            1,
            option.index,
            RawValue::Single("true".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_shell_core::OptionMetadata;

    #[test]
    fn test_claims_short_and_long_forms() {
        let command = CommandMetadata::new("build")
            .with_option(OptionMetadata::named_boolean(Some("-q"), Some("--quiet")));
        let parsed = ParsedOptions::default();

        for flag in ["-q", "--quiet"] {
            let tokens = vec![flag.to_string(), "rest".to_string()];
            let claim = NamedBooleanParser
                .try_claim(&command, &TokenCursor::new(&tokens), &parsed)
                .unwrap();
            assert_eq!(claim, Claim::value(1, 0, RawValue::Single("true".into())));
        }
    }

    #[test]
    fn test_ignores_value_flags() {
        let command = CommandMetadata::new("build")
            .with_option(OptionMetadata::named_value(None, Some("--out")));
        let tokens = vec!["--out".to_string()];

        assert!(
            NamedBooleanParser
                .try_claim(&command, &TokenCursor::new(&tokens), &ParsedOptions::default())
                .is_none()
        );
    }
}
