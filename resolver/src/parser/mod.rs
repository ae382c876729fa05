//! Composite option parsing over a token cursor.
//!
//! The [`CompositeParser`] walks the tokens left after plugin/command
//! resolution. On each pass it offers the cursor to its strategies in fixed
//! priority order; the first strategy to claim tokens wins the pass. Passes
//! repeat until every token has been claimed, either as an option value or
//! as a recorded [`ParseError`].

pub mod strategies;

use std::collections::BTreeMap;
use std::fmt;

use plugin_shell_core::{CommandMetadata, Parameter, PromptType};
use tracing::debug;

use strategies::{Claim, ClaimOutcome, OptionParser};

pub use plugin_shell_core::is_flag_shaped;

/// Read position over an immutable token sequence.
#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'t> {
    tokens: &'t [String],
    position: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [String]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &'t [String] {
        &self.tokens[self.position..]
    }

    /// Next unconsumed token.
    pub fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    /// Offset of the next token from the start of the sequence.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Consumes up to `count` tokens.
    pub fn advance(&mut self, count: usize) {
        self.position = (self.position + count).min(self.tokens.len());
    }
}

/// Value claimed for one option before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Value of a boolean, single-value named, or single positional option.
    Single(String),
    /// Values of a vararg option, in input order.
    Many(Vec<String>),
}

impl RawValue {
    /// Returns `true` if the value (every element, for sequences) matches
    /// `prompt_type`.
    pub fn matches(&self, prompt_type: &PromptType) -> bool {
        match self {
            Self::Single(value) => prompt_type.matches(value),
            Self::Many(values) => values.iter().all(|v| prompt_type.matches(v)),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => f.write_str(value),
            Self::Many(values) => f.write_str(&values.join(" ")),
        }
    }
}

impl From<RawValue> for Parameter {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Single(value) => Parameter::Text(value),
            RawValue::Many(values) => Parameter::List(values),
        }
    }
}

/// A token that no strategy could claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Offset of the token among the option tokens.
    pub position: usize,
    pub token: String,
}

impl ParseError {
    pub fn new(position: usize, token: impl Into<String>) -> Self {
        Self {
            position,
            token: token.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized token [{}] at position {}",
            self.token, self.position
        )
    }
}

impl std::error::Error for ParseError {}

/// Raw value mapping produced by the [`CompositeParser`].
///
/// Keyed by option index. Options that claimed no tokens are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    values: BTreeMap<usize, RawValue>,
    errors: Vec<ParseError>,
    claimed: usize,
}

impl ParsedOptions {
    /// Raw value for the option at `index`.
    pub fn get(&self, index: usize) -> Option<&RawValue> {
        self.values.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.values.contains_key(&index)
    }

    /// Removes and returns the raw value for the option at `index`.
    pub fn take(&mut self, index: usize) -> Option<RawValue> {
        self.values.remove(&index)
    }

    /// All values keyed by option index.
    pub fn values(&self) -> &BTreeMap<usize, RawValue> {
        &self.values
    }

    /// Tokens recorded by the fallback strategy.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Returns `true` when no parse error was recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total tokens consumed, values and errors alike.
    pub fn claimed(&self) -> usize {
        self.claimed
    }

    fn apply(&mut self, consumed: usize, outcome: ClaimOutcome) {
        self.claimed += consumed;
        match outcome {
            ClaimOutcome::Value { index, value } => self.record(index, value),
            ClaimOutcome::Consumed => {}
            ClaimOutcome::Error(err) => self.errors.push(err),
        }
    }

    // Repeated sequences append; anything else replaces.
    fn record(&mut self, index: usize, value: RawValue) {
        match (self.values.get_mut(&index), value) {
            (Some(RawValue::Many(existing)), RawValue::Many(more)) => existing.extend(more),
            (_, value) => {
                self.values.insert(index, value);
            }
        }
    }
}

/// Ordered chain of [`OptionParser`] strategies.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::{CommandMetadata, OptionMetadata};
/// use plugin_shell_resolver::parser::{CompositeParser, RawValue};
///
/// let command = CommandMetadata::new("create")
///     .with_option(OptionMetadata::named_value(None, Some("--flag")))
///     .with_option(OptionMetadata::ordered_value());
///
/// let tokens: Vec<String> = ["positional1", "--flag", "value"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let parsed = CompositeParser::standard().parse(&command, &tokens);
///
/// assert_eq!(parsed.get(0), Some(&RawValue::Single("value".into())));
/// assert_eq!(parsed.get(1), Some(&RawValue::Single("positional1".into())));
/// assert_eq!(parsed.claimed(), 3);
/// ```
pub struct CompositeParser {
    strategies: Vec<Box<dyn OptionParser>>,
}

impl CompositeParser {
    /// Creates a parser from strategies in priority order.
    ///
    /// The chain should end with a strategy that always claims (such as
    /// [`strategies::ParseErrorParser`]); a token nothing claims is recorded
    /// as a parse error regardless.
    pub fn new(strategies: Vec<Box<dyn OptionParser>>) -> Self {
        Self { strategies }
    }

    /// The five option strategies followed by the parse-error fallback.
    pub fn standard() -> Self {
        Self::new(strategies::standard_strategies())
    }

    /// Strategy names in priority order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Parses `tokens` against the options of `command`.
    pub fn parse(&self, command: &CommandMetadata, tokens: &[String]) -> ParsedOptions {
        let mut cursor = TokenCursor::new(tokens);
        let mut parsed = ParsedOptions::default();

        while let Some(token) = cursor.peek() {
            let position = cursor.position();
            let claim = self.strategies.iter().find_map(|strategy| {
                strategy
                    .try_claim(command, &cursor, &parsed)
                    .map(|claim| (strategy.name(), claim))
            });

            let (strategy, Claim { consumed, outcome }) = claim.unwrap_or_else(|| {
                (
                    "unclaimed",
                    Claim::error(ParseError::new(position, token)),
                )
            });
            let consumed = consumed.clamp(1, cursor.remaining().len());

            debug!(
                command = %command.name,
                strategy,
                position,
                consumed,
                "claimed option tokens"
            );
            parsed.apply(consumed, outcome);
            cursor.advance(consumed);
        }

        parsed
    }
}

impl Default for CompositeParser {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for CompositeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeParser")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_shell_core::{OptionMetadata, PromptType};

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn mixed_command() -> CommandMetadata {
        CommandMetadata::new("cmd2")
            .with_option(OptionMetadata::named_boolean(Some("-f"), Some("--force")))
            .with_option(OptionMetadata::named_value(None, Some("--other")))
            .with_option(OptionMetadata::named_varargs(None, Some("--files")))
            .with_option(OptionMetadata::ordered_value())
            .with_option(OptionMetadata::ordered_varargs())
    }

    fn many(values: &[&str]) -> RawValue {
        RawValue::Many(values.iter().map(|s| s.to_string()).collect())
    }

    fn single(value: &str) -> RawValue {
        RawValue::Single(value.to_string())
    }

    #[test]
    fn test_standard_chain_order() {
        assert_eq!(
            CompositeParser::standard().strategy_names(),
            vec![
                "named-boolean",
                "named-value",
                "named-varargs",
                "ordered-value",
                "ordered-varargs",
                "parse-error",
            ]
        );
    }

    #[test]
    fn test_named_varargs_stop_at_next_flag() {
        let parsed =
            CompositeParser::standard().parse(&mixed_command(), &tokens("--files a b c --other x"));
        assert_eq!(parsed.get(2), Some(&many(&["a", "b", "c"])));
        assert_eq!(parsed.get(1), Some(&single("x")));
        assert_eq!(parsed.claimed(), 6);
        assert!(parsed.is_clean());
    }

    #[test]
    fn test_every_token_is_accounted_for() {
        let command = CommandMetadata::new("cmd1")
            .with_option(OptionMetadata::named_boolean(Some("-f"), Some("--force")))
            .with_option(OptionMetadata::named_value(None, Some("--other")))
            .with_option(OptionMetadata::ordered_value());
        let input = tokens("-f pos --bogus --other x extra");
        let parsed = CompositeParser::standard().parse(&command, &input);

        assert_eq!(parsed.claimed(), input.len());
        assert_eq!(parsed.get(0), Some(&single("true")));
        assert_eq!(parsed.get(2), Some(&single("pos")));
        assert_eq!(parsed.get(1), Some(&single("x")));
        assert_eq!(
            parsed.errors(),
            &[ParseError::new(2, "--bogus"), ParseError::new(5, "extra")]
        );
    }

    #[test]
    fn test_unknown_flag_after_positional_joins_the_vararg() {
        let input = tokens("-f pos --bogus --other x rest");
        let parsed = CompositeParser::standard().parse(&mixed_command(), &input);

        assert!(parsed.is_clean());
        assert_eq!(parsed.get(3), Some(&single("pos")));
        assert_eq!(parsed.get(4), Some(&many(&["--bogus", "--other", "x", "rest"])));
        assert!(!parsed.contains(1));
    }

    #[test]
    fn test_vararg_takes_flag_shaped_tokens_in_either_order() {
        let command = CommandMetadata::new("echo").with_option(OptionMetadata::ordered_varargs());

        let parsed = CompositeParser::standard().parse(&command, &tokens("a --x"));
        assert_eq!(parsed.get(0), Some(&many(&["a", "--x"])));
        assert!(parsed.is_clean());

        let parsed = CompositeParser::standard().parse(&command, &tokens("--x a"));
        assert_eq!(parsed.get(0), Some(&many(&["--x", "a"])));
        assert!(parsed.is_clean());
    }

    #[test]
    fn test_ordered_varargs_take_everything_remaining() {
        let parsed =
            CompositeParser::standard().parse(&mixed_command(), &tokens("one two --other x"));
        assert_eq!(parsed.get(3), Some(&single("one")));
        assert_eq!(parsed.get(4), Some(&many(&["two", "--other", "x"])));
        assert!(!parsed.contains(1));
    }

    #[test]
    fn test_named_value_without_value_claims_flag_only() {
        let parsed = CompositeParser::standard().parse(&mixed_command(), &tokens("--other"));
        assert!(!parsed.contains(1));
        assert_eq!(parsed.claimed(), 1);
        assert!(parsed.is_clean());

        let parsed = CompositeParser::standard().parse(&mixed_command(), &tokens("--other -f"));
        assert!(!parsed.contains(1));
        assert_eq!(parsed.get(0), Some(&single("true")));
    }

    #[test]
    fn test_repeated_flags() {
        let parsed = CompositeParser::standard().parse(
            &mixed_command(),
            &tokens("--other a --files x --other b --files y z"),
        );
        assert_eq!(parsed.get(1), Some(&single("b")));
        assert_eq!(parsed.get(2), Some(&many(&["x", "y", "z"])));
    }

    #[test]
    fn test_surplus_positional_is_an_error() {
        let command = CommandMetadata::new("one").with_option(OptionMetadata::ordered_value());
        let parsed = CompositeParser::standard().parse(&command, &tokens("a b"));
        assert_eq!(parsed.get(0), Some(&single("a")));
        assert_eq!(parsed.errors(), &[ParseError::new(1, "b")]);
    }

    #[test]
    fn test_chain_without_fallback_still_records_errors() {
        let parser = CompositeParser::new(vec![Box::new(strategies::NamedBooleanParser)]);
        let parsed = parser.parse(&mixed_command(), &tokens("-f stray"));
        assert_eq!(parsed.get(0), Some(&single("true")));
        assert_eq!(parsed.errors(), &[ParseError::new(1, "stray")]);
        assert_eq!(parsed.claimed(), 2);
    }

    #[test]
    fn test_raw_value_matches_every_element() {
        assert!(many(&["1", "2"]).matches(&PromptType::Number));
        assert!(!many(&["1", "x"]).matches(&PromptType::Number));
        assert_eq!(many(&["a", "b"]).to_string(), "a b");
    }

    #[test]
    fn test_cursor_advance_is_bounded() {
        let input = tokens("a b");
        let mut cursor = TokenCursor::new(&input);
        cursor.advance(5);
        assert!(cursor.is_exhausted());
        assert!(cursor.remaining().is_empty());
        assert_eq!(cursor.peek(), None);
    }
}
