//! Metadata type definitions for plugins, commands, and their options.
//!
//! This module defines the read-only data model that describes what a
//! plugin offers. Nothing here parses input; the resolver crate consumes
//! these descriptions to turn a raw line into an [`Execution`](crate::Execution).
//! All types serialize with [`serde`] so registries can be loaded from JSON
//! or YAML files.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Version of the metadata contract (semver).
///
/// Embedded in every [`PluginPackage`](crate::PluginPackage) to track
/// compatibility across metadata revisions.
pub const METADATA_CONTRACT_VERSION: &str = "1.0.0";

static FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--?[A-Za-z][A-Za-z0-9_-]*$").expect("static regex must compile")
});

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| anchored(PromptType::Identifier.pattern()));
static QUALIFIED_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| anchored(PromptType::QualifiedName.pattern()));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| anchored(PromptType::Number.pattern()));
static FILE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| anchored(PromptType::FilePath.pattern()));

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("static regex must compile")
}

/// Returns `true` for `-x` / `--name` style tokens.
///
/// This is the only flag grammar: declared flags must satisfy it and the
/// parser only treats such tokens as flags. A lone `-`, `--`, and negative
/// numbers are values.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::is_flag_shaped;
///
/// assert!(is_flag_shaped("--files"));
/// assert!(is_flag_shaped("-f"));
/// assert!(!is_flag_shaped("-5"));
/// assert!(!is_flag_shaped("-"));
/// assert!(!is_flag_shaped("--dry.run"));
/// assert!(!is_flag_shaped("value"));
/// ```
pub fn is_flag_shaped(token: &str) -> bool {
    FLAG_RE.is_match(token)
}

/// How an option is expressed on the command line.
///
/// Named kinds are introduced by a flag (`--name` or `-n`); ordered kinds are
/// positional and filled in declaration order.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::OptionKind;
///
/// assert!(OptionKind::NamedVarargs.is_named());
/// assert!(OptionKind::NamedVarargs.is_vararg());
/// assert!(!OptionKind::OrderedValue.is_named());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Flag without a value (`--force`); presence means `true`.
    NamedBoolean,
    /// Flag followed by exactly one value (`--name foo`).
    NamedValue,
    /// Flag followed by every value up to the next flag (`--files a b c`).
    NamedVarargs,
    /// Single positional value.
    OrderedValue,
    /// Trailing positional option that takes every remaining token.
    OrderedVarargs,
}

impl OptionKind {
    /// Returns `true` for flag-introduced kinds.
    pub fn is_named(self) -> bool {
        matches!(
            self,
            Self::NamedBoolean | Self::NamedValue | Self::NamedVarargs
        )
    }

    /// Returns `true` for positional kinds.
    pub fn is_ordered(self) -> bool {
        !self.is_named()
    }

    /// Returns `true` for kinds that collect a sequence of values.
    pub fn is_vararg(self) -> bool {
        matches!(self, Self::NamedVarargs | Self::OrderedVarargs)
    }
}

/// Semantic value type of an option.
///
/// Fixed when the metadata is built and used to pick the prompt variant when
/// a required value is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Yes/no value.
    Boolean,
    /// Filesystem path.
    File,
    /// Plain text (the default).
    #[default]
    Text,
}

impl ValueType {
    /// Short label used in prompt descriptors.
    pub fn label(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::File => "file",
            Self::Text => "text",
        }
    }
}

/// Validation pattern attached to an option.
///
/// Every pattern must match the *whole* value. [`PromptType::Any`] accepts
/// everything and marks an option as free text.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::PromptType;
///
/// assert!(PromptType::Any.matches("anything at all"));
/// assert!(PromptType::Number.matches("-42"));
/// assert!(!PromptType::Number.matches("4x2"));
/// assert!(PromptType::QualifiedName.matches("org.example.tools"));
/// assert!(PromptType::Custom("v[0-9]+".into()).matches("v12"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptType {
    /// Accepts any value (the default).
    #[default]
    Any,
    /// Simple identifier: letter or underscore, then word characters or `-`.
    Identifier,
    /// Dot-separated identifiers (`org.example.tools`).
    QualifiedName,
    /// Signed integer or decimal number.
    Number,
    /// Non-empty path that does not start with whitespace.
    FilePath,
    /// User-supplied regular expression.
    Custom(String),
}

impl PromptType {
    /// Returns the unanchored regular expression for this prompt type.
    pub fn pattern(&self) -> &str {
        match self {
            Self::Any => ".*",
            Self::Identifier => "[A-Za-z_][A-Za-z0-9_-]*",
            Self::QualifiedName => r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*",
            Self::Number => r"-?[0-9]+(\.[0-9]+)?",
            Self::FilePath => r"\S.*",
            Self::Custom(pattern) => pattern,
        }
    }

    /// Returns `true` when this prompt type accepts any value.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Compiles the pattern anchored at both ends.
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] when a [`PromptType::Custom`] pattern is
    /// not a valid regular expression.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^(?:{})$", self.pattern()))
    }

    /// Returns `true` if `value` matches the whole pattern.
    ///
    /// A custom pattern that fails to compile matches nothing; registries
    /// reject such patterns on load.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Identifier => IDENTIFIER_RE.is_match(value),
            Self::QualifiedName => QUALIFIED_NAME_RE.is_match(value),
            Self::Number => NUMBER_RE.is_match(value),
            Self::FilePath => FILE_PATH_RE.is_match(value),
            Self::Custom(_) => self.compile().is_ok_and(|re| re.is_match(value)),
        }
    }
}

/// Declared parameter of a command.
///
/// The `index` fixes the slot this option fills in the resolved parameter
/// array. Named options carry a long form (`--message`) and/or a short form
/// (`-m`); ordered options are identified only by position.
///
/// Use the constructors ([`named_boolean`](Self::named_boolean),
/// [`named_value`](Self::named_value), …) and chain builder methods; adding
/// the option to a command through [`CommandMetadata::with_option`] assigns
/// its index.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::{OptionMetadata, PromptType, ValueType};
///
/// let name = OptionMetadata::named_value(Some("-n"), Some("--name"))
///     .with_prompt_type(PromptType::Identifier)
///     .required();
/// assert!(name.matches("--name"));
/// assert!(name.matches("-n"));
/// assert_eq!(name.canonical_name(), "--name");
///
/// let force = OptionMetadata::named_boolean(None, Some("--force"));
/// assert_eq!(force.value_type, ValueType::Boolean);
/// assert_eq!(force.descriptor(), "--force");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionMetadata {
    /// Slot in the resolved parameter array.
    #[serde(default)]
    pub index: usize,
    /// How the option appears on the line.
    pub kind: OptionKind,
    /// Long flag form (e.g. "--message")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Short flag form (e.g. "-m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Human-readable description, used as the prompt label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Semantic value type.
    #[serde(default)]
    pub value_type: ValueType,
    /// Validation pattern.
    #[serde(default)]
    pub prompt_type: PromptType,
    /// Must the option end up with a value?
    #[serde(default)]
    pub required: bool,
    /// Value used when the option is absent, taken as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl OptionMetadata {
    fn new(kind: OptionKind, short: Option<&str>, long: Option<&str>) -> Self {
        Self {
            index: 0,
            kind,
            long: long.map(String::from),
            short: short.map(String::from),
            description: None,
            value_type: ValueType::Text,
            prompt_type: PromptType::Any,
            required: false,
            default_value: None,
        }
    }

    /// Creates a boolean flag; its presence sets the value to `true`.
    pub fn named_boolean(short: Option<&str>, long: Option<&str>) -> Self {
        Self::new(OptionKind::NamedBoolean, short, long).with_value_type(ValueType::Boolean)
    }

    /// Creates a flag that takes exactly one value.
    pub fn named_value(short: Option<&str>, long: Option<&str>) -> Self {
        Self::new(OptionKind::NamedValue, short, long)
    }

    /// Creates a flag that collects values up to the next flag.
    pub fn named_varargs(short: Option<&str>, long: Option<&str>) -> Self {
        Self::new(OptionKind::NamedVarargs, short, long)
    }

    /// Creates a single positional option.
    pub fn ordered_value() -> Self {
        Self::new(OptionKind::OrderedValue, None, None)
    }

    /// Creates a trailing positional option that takes all remaining tokens.
    pub fn ordered_varargs() -> Self {
        Self::new(OptionKind::OrderedVarargs, None, None)
    }

    /// Sets the slot index explicitly.
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the semantic value type.
    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Sets the validation pattern.
    pub fn with_prompt_type(mut self, prompt_type: PromptType) -> Self {
        self.prompt_type = prompt_type;
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns `true` if a default value is declared.
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    /// Returns `true` for flag-introduced options.
    pub fn is_named(&self) -> bool {
        self.kind.is_named()
    }

    /// Returns `true` for positional options.
    pub fn is_ordered(&self) -> bool {
        self.kind.is_ordered()
    }

    /// Returns `true` for options collecting a sequence of values.
    pub fn is_vararg(&self) -> bool {
        self.kind.is_vararg()
    }

    /// Returns `true` for boolean-typed options.
    pub fn is_boolean(&self) -> bool {
        self.value_type == ValueType::Boolean
    }

    /// Returns `true` for file-typed options.
    pub fn is_file(&self) -> bool {
        self.value_type == ValueType::File
    }

    /// Returns the canonical flag (long form preferred, falls back to short).
    ///
    /// Ordered options have no flag and return `"arg<index>"`.
    pub fn canonical_name(&self) -> String {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .map(String::from)
            .unwrap_or_else(|| format!("arg{}", self.index))
    }

    /// Checks if a token names this option (short or long form).
    ///
    /// Always `false` for ordered options.
    pub fn matches(&self, flag: &str) -> bool {
        self.is_named()
            && (self.short.as_deref() == Some(flag) || self.long.as_deref() == Some(flag))
    }

    /// Label shown when prompting for this option.
    ///
    /// The description wins over the flag name; non-boolean options append
    /// their value type.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_shell_core::{OptionMetadata, ValueType};
    ///
    /// let opt = OptionMetadata::ordered_value()
    ///     .with_value_type(ValueType::File)
    ///     .with_description("Target directory");
    /// assert_eq!(opt.descriptor(), "Target directory [file]");
    ///
    /// let bare = OptionMetadata::ordered_value().at_index(2);
    /// assert_eq!(bare.descriptor(), "arg2 [text]");
    /// ```
    pub fn descriptor(&self) -> String {
        let label = self
            .description
            .clone()
            .unwrap_or_else(|| self.canonical_name());
        if self.is_boolean() {
            label
        } else {
            format!("{label} [{}]", self.value_type.label())
        }
    }
}

/// Metadata for one invocable command of a plugin.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::{CommandMetadata, OptionMetadata};
///
/// let cmd = CommandMetadata::new("create")
///     .with_option(OptionMetadata::named_value(None, Some("--name")))
///     .with_option(OptionMetadata::ordered_value());
///
/// assert_eq!(cmd.option_count(), 2);
/// assert_eq!(cmd.options[1].index, 1);
/// assert!(cmd.find_named("--name").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Command name as typed after the plugin name.
    pub name: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared options; list order matches `index`.
    #[serde(default)]
    pub options: Vec<OptionMetadata>,
}

impl CommandMetadata {
    /// Creates a command with no options.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Appends an option, assigning it the next index.
    pub fn with_option(mut self, option: OptionMetadata) -> Self {
        let index = self.options.len();
        self.options.push(option.at_index(index));
        self
    }

    /// Number of declared options (and of resolved parameter slots).
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Finds the option occupying slot `index`.
    pub fn option(&self, index: usize) -> Option<&OptionMetadata> {
        self.options.iter().find(|o| o.index == index)
    }

    /// Finds a named option by short or long flag.
    pub fn find_named(&self, flag: &str) -> Option<&OptionMetadata> {
        self.options.iter().find(|o| o.matches(flag))
    }

    /// Positional options in ascending index order.
    pub fn ordered_options(&self) -> Vec<&OptionMetadata> {
        let mut ordered: Vec<&OptionMetadata> =
            self.options.iter().filter(|o| o.is_ordered()).collect();
        ordered.sort_by_key(|o| o.index);
        ordered
    }
}

/// Metadata for a plugin: a named group of commands.
///
/// A plugin may declare a default command. When present it is selected for
/// every invocation of the plugin, even when the next token names one of the
/// plugin's other commands.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::{CommandMetadata, PluginMetadata};
///
/// let plugin = PluginMetadata::new("project")
///     .with_command(CommandMetadata::new("create"))
///     .with_command(CommandMetadata::new("delete"));
///
/// assert!(plugin.command("create").is_some());
/// assert!(plugin.command("list").is_none());
/// assert_eq!(plugin.command_names(), vec!["create", "delete"]);
/// assert!(!plugin.has_default_command());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Plugin name; the first token of a line.
    pub name: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Named commands in declaration order.
    #[serde(default)]
    pub commands: Vec<CommandMetadata>,
    /// Command used regardless of the second token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_command: Option<CommandMetadata>,
}

impl PluginMetadata {
    /// Creates a plugin with no commands.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds a named command.
    pub fn with_command(mut self, command: CommandMetadata) -> Self {
        self.commands.push(command);
        self
    }

    /// Declares the default command.
    pub fn with_default_command(mut self, command: CommandMetadata) -> Self {
        self.default_command = Some(command);
        self
    }

    /// Finds a named command.
    pub fn command(&self, name: &str) -> Option<&CommandMetadata> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Returns `true` if a default command is declared.
    pub fn has_default_command(&self) -> bool {
        self.default_command.is_some()
    }

    /// Gets all named command names in declaration order.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Read-only lookup of plugins by name.
///
/// Resolution only ever reads from the source; implementations hand out a
/// snapshot that stays valid for the whole resolution.
pub trait PluginSource {
    fn plugin(&self, name: &str) -> Option<&PluginMetadata>;
}

impl PluginSource for BTreeMap<String, PluginMetadata> {
    fn plugin(&self, name: &str) -> Option<&PluginMetadata> {
        self.get(name)
    }
}

impl<S: BuildHasher> PluginSource for HashMap<String, PluginMetadata, S> {
    fn plugin(&self, name: &str) -> Option<&PluginMetadata> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_kind_classification() {
        assert!(OptionKind::NamedBoolean.is_named());
        assert!(OptionKind::NamedValue.is_named());
        assert!(OptionKind::OrderedVarargs.is_ordered());
        assert!(OptionKind::OrderedVarargs.is_vararg());
        assert!(!OptionKind::NamedValue.is_vararg());
    }

    #[test]
    fn test_builtin_patterns_agree_with_compile() {
        for pt in [
            PromptType::Identifier,
            PromptType::QualifiedName,
            PromptType::Number,
            PromptType::FilePath,
        ] {
            let compiled = pt.compile().unwrap();
            for value in ["abc", "a.b", "-1.5", " x", "x y", ""] {
                assert_eq!(pt.matches(value), compiled.is_match(value), "{pt:?} on {value:?}");
            }
        }
    }

    #[test]
    fn test_flag_grammar() {
        assert!(is_flag_shaped("--dry-run"));
        assert!(is_flag_shaped("-v"));
        assert!(!is_flag_shaped("--dry.run"));
        assert!(!is_flag_shaped("--a=b"));
        assert!(!is_flag_shaped("-1"));
        assert!(!is_flag_shaped("--"));
    }

    #[test]
    fn test_prompt_type_matches_whole_value() {
        assert!(PromptType::Identifier.matches("my-project"));
        assert!(!PromptType::Identifier.matches("my project"));
        assert!(!PromptType::Number.matches("12abc"));
        assert!(PromptType::Number.matches("3.14"));
        assert!(PromptType::FilePath.matches("src/main.rs"));
        assert!(!PromptType::FilePath.matches(""));
    }

    #[test]
    fn test_custom_prompt_type_is_anchored() {
        let pt = PromptType::Custom("[a-c]+".to_string());
        assert!(pt.matches("abc"));
        assert!(!pt.matches("abcd"));
        assert!(!pt.matches("xabc"));
    }

    #[test]
    fn test_invalid_custom_pattern_matches_nothing() {
        let pt = PromptType::Custom("(".to_string());
        assert!(pt.compile().is_err());
        assert!(!pt.matches("("));
    }

    #[test]
    fn test_ordered_option_never_matches_flag() {
        let opt = OptionMetadata::ordered_value();
        assert!(!opt.matches("--anything"));
        assert_eq!(opt.canonical_name(), "arg0");
    }

    #[test]
    fn test_with_option_assigns_contiguous_indices() {
        let cmd = CommandMetadata::new("copy")
            .with_option(OptionMetadata::named_boolean(Some("-f"), Some("--force")))
            .with_option(OptionMetadata::ordered_value().at_index(42))
            .with_option(OptionMetadata::ordered_varargs());

        let indices: Vec<usize> = cmd.options.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(cmd.ordered_options().len(), 2);
        assert_eq!(cmd.option(2).map(|o| o.kind), Some(OptionKind::OrderedVarargs));
    }

    #[test]
    fn test_plugin_metadata_from_json() {
        let json = serde_json::json!({
            "name": "project",
            "commands": [{
                "name": "create",
                "options": [
                    {"kind": "named_value", "long": "--name", "prompt_type": "identifier", "required": true},
                    {"index": 1, "kind": "ordered_value", "value_type": "file"},
                    {"index": 2, "kind": "ordered_value", "prompt_type": {"custom": "v[0-9]+"}}
                ]
            }],
            "default_command": {"name": "status"}
        });

        let plugin: PluginMetadata = serde_json::from_value(json).unwrap();
        let create = plugin.command("create").unwrap();
        assert_eq!(create.options[0].prompt_type, PromptType::Identifier);
        assert!(create.options[0].required);
        assert_eq!(create.options[1].value_type, ValueType::File);
        assert_eq!(
            create.options[2].prompt_type,
            PromptType::Custom("v[0-9]+".to_string())
        );
        assert_eq!(plugin.default_command.as_ref().unwrap().name, "status");
    }
}
