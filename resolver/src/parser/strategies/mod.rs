//! Pluggable strategies, each claiming one syntax shape from the cursor.

pub mod named_boolean;
pub mod named_value;
pub mod named_varargs;
pub mod ordered_value;
pub mod ordered_varargs;
pub mod parse_error;

pub use named_boolean::NamedBooleanParser;
pub use named_value::NamedValueParser;
pub use named_varargs::NamedVarargsParser;
pub use ordered_value::OrderedValueParser;
pub use ordered_varargs::OrderedVarargsParser;
pub use parse_error::ParseErrorParser;

use plugin_shell_core::CommandMetadata;

use super::{ParseError, ParsedOptions, RawValue, TokenCursor};

/// Strategy that tries to claim a prefix of the remaining tokens.
///
/// Strategies are consulted in priority order by the
/// [`CompositeParser`](super::CompositeParser); returning `None` passes the
/// cursor to the next strategy. A returned [`Claim`] must consume at least
/// one token.
pub trait OptionParser {
    fn name(&self) -> &'static str;
    fn try_claim(
        &self,
        command: &CommandMetadata,
        cursor: &TokenCursor<'_>,
        parsed: &ParsedOptions,
    ) -> Option<Claim>;
}

/// Tokens consumed by one strategy and what they produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub consumed: usize,
    pub outcome: ClaimOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// A value for the option at `index`.
    Value { index: usize, value: RawValue },
    /// Tokens consumed without producing a value (a flag missing its value).
    Consumed,
    /// Tokens nothing could interpret.
    Error(ParseError),
}

impl Claim {
    pub fn value(consumed: usize, index: usize, value: RawValue) -> Self {
        Self {
            consumed,
            outcome: ClaimOutcome::Value { index, value },
        }
    }

    pub fn consumed(consumed: usize) -> Self {
        Self {
            consumed,
            outcome: ClaimOutcome::Consumed,
        }
    }

    pub fn error(error: ParseError) -> Self {
        Self {
            consumed: 1,
            outcome: ClaimOutcome::Error(error),
        }
    }
}

/// The standard chain: named-boolean, named-value, named-varargs,
/// ordered-value, ordered-varargs, then the parse-error fallback.
pub fn standard_strategies() -> Vec<Box<dyn OptionParser>> {
    vec![
        Box::new(NamedBooleanParser),
        Box::new(NamedValueParser),
        Box::new(NamedVarargsParser),
        Box::new(OrderedValueParser),
        Box::new(OrderedVarargsParser),
        Box::new(ParseErrorParser),
    ]
}
