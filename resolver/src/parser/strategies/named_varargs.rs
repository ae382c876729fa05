//! `--files a b c` style flags.

use plugin_shell_core::{CommandMetadata, OptionKind};
use tracing::debug;

use super::{Claim, OptionParser};
use crate::parser::{ParsedOptions, RawValue, TokenCursor, is_flag_shaped};

/// Claims a flag and every following token up to the next flag-shaped token.
pub struct NamedVarargsParser;

impl OptionParser for NamedVarargsParser {
    fn name(&self) -> &'static str {
        "named-varargs"
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
            .filter(|o| o.kind == OptionKind::NamedVarargs)?;

        let values: Vec<String> = cursor.remaining()[1..]
            .iter()
            .take_while(|token| !is_flag_shaped(token))
            .cloned()
            .collect();

        if values.is_empty() {
            debug!(flag, "vararg flag given without values");
            return Some(Claim::consumed(1));
        }
        Some(Claim::value(
            values.len() + 1,
            option.index,
            RawValue::Many(values),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_shell_core::OptionMetadata;

    fn claim(line: &[&str]) -> Option<Claim> {
        let command = CommandMetadata::new("add")
            .with_option(OptionMetadata::named_varargs(Some("-f"), Some("--files")));
        let tokens: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        NamedVarargsParser.try_claim(&command, &TokenCursor::new(&tokens), &ParsedOptions::default())
    }

    #[test]
    fn test_collects_until_next_flag() {
        assert_eq!(
            claim(&["--files", "a", "b", "c", "--other", "x"]),
            Some(Claim::value(
                4,
                0,
                RawValue::Many(vec!["a".into(), "b".into(), "c".into()])
            ))
        );
    }

    #[test]
    fn test_collects_until_end_of_input() {
        assert_eq!(
            claim(&["-f", "a", "-1"]),
            Some(Claim::value(3, 0, RawValue::Many(vec!["a".into(), "-1".into()])))
        );
    }

    #[test]
    fn test_empty_sequence_consumes_flag_only() {
        assert_eq!(claim(&["--files", "--x"]), Some(Claim::consumed(1)));
    }
}
