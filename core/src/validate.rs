//! Plugin and command metadata validation.
//!
//! Validates the structural invariants the resolver relies on: contiguous
//! option indices, well-formed flag names, a single trailing positional
//! vararg, and compilable prompt patterns. Each scope stops at its first
//! problem.
//!
//! # Examples
//!
//! ```
//! use plugin_shell_core::*;
//!
//! let cmd = CommandMetadata::new("create")
//!     .with_option(OptionMetadata::named_value(Some("-n"), Some("--name")));
//! assert!(validate_command(&cmd).is_empty());
//!
//! // Invalid: short flag missing leading dash
//! let bad = CommandMetadata::new("create")
//!     .with_option(OptionMetadata::named_value(Some("n"), Some("--name")));
//! assert!(!validate_command(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    CommandMetadata, OptionKind, OptionMetadata, PluginMetadata, PluginPackage, ValueType,
    is_flag_shaped,
};

/// Metadata validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Package version string is empty.
    #[error("package version cannot be empty")]
    EmptyPackageVersion,
    /// Plugin name is empty or whitespace-only.
    #[error("plugin name cannot be empty")]
    EmptyPluginName,
    /// Two plugins share a name.
    #[error("duplicate plugin: {0}")]
    DuplicatePlugin(String),
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Two commands of one plugin share a name.
    #[error("duplicate command in plugin: {0}")]
    DuplicateCommand(String),
    /// Option indices are not exactly `0..option_count`.
    #[error("command {command}: option indices must be unique and contiguous from 0, found {found:?}")]
    NonContiguousIndices { command: String, found: Vec<usize> },
    /// A named option has neither short nor long form.
    #[error("command {0}: named option at index {1} must define short or long form")]
    MissingFlagName(String, usize),
    /// Short flag does not look like `-x`.
    #[error("invalid short flag format: {0}")]
    InvalidShortFlag(String),
    /// Long flag does not look like `--name`.
    #[error("invalid long flag format: {0}")]
    InvalidLongFlag(String),
    /// Two options of one command share a flag.
    #[error("duplicate flag in command: {0}")]
    DuplicateFlag(String),
    /// Positional vararg is repeated or followed by another positional option.
    #[error("command {0}: ordered varargs option must be the single, last positional option")]
    MisplacedOrderedVarargs(String),
    /// A boolean flag declared with a non-boolean value type.
    #[error("command {0}: boolean flag {1} must have boolean value type")]
    BooleanFlagType(String, String),
    /// Custom prompt pattern does not compile.
    #[error("command {command}: invalid pattern for {option}: {reason}")]
    InvalidPattern {
        command: String,
        option: String,
        reason: String,
    },
}

/// Validates a full plugin package.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::*;
///
/// let mut package = PluginPackage::new("1.0.0");
/// package.plugins.push(PluginMetadata::new("project"));
/// assert!(validate_package(&package).is_empty());
///
/// package.plugins.push(PluginMetadata::new("project"));
/// let errors = validate_package(&package);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicatePlugin(_))));
/// ```
pub fn validate_package(package: &PluginPackage) -> Vec<ValidationError> {
    if package.version.trim().is_empty() {
        return vec![ValidationError::EmptyPackageVersion];
    }
    validate_plugins(&package.plugins)
}

/// Validates a set of plugins, rejecting duplicate names.
pub fn validate_plugins(plugins: &[PluginMetadata]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for plugin in plugins {
        if !seen.insert(plugin.name.as_str()) {
            errors.push(ValidationError::DuplicatePlugin(plugin.name.clone()));
            return errors;
        }
        errors.extend(validate_plugin(plugin));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates a plugin and all of its commands, including the default command.
pub fn validate_plugin(plugin: &PluginMetadata) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if plugin.name.trim().is_empty() {
        errors.push(ValidationError::EmptyPluginName);
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for command in &plugin.commands {
        if !seen.insert(command.name.as_str()) {
            errors.push(ValidationError::DuplicateCommand(command.name.clone()));
            return errors;
        }
        errors.extend(validate_command(command));
        if !errors.is_empty() {
            return errors;
        }
    }

    if let Some(default) = &plugin.default_command {
        errors.extend(validate_command(default));
    }

    errors
}

/// Validates a single command's option list.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::*;
///
/// let mut cmd = CommandMetadata::new("copy")
///     .with_option(OptionMetadata::ordered_value())
///     .with_option(OptionMetadata::ordered_value());
/// cmd.options[1].index = 5;
///
/// let errors = validate_command(&cmd);
/// assert!(matches!(errors[0], ValidationError::NonContiguousIndices { .. }));
/// ```
pub fn validate_command(command: &CommandMetadata) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if command.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    let mut indices: Vec<usize> = command.options.iter().map(|o| o.index).collect();
    indices.sort_unstable();
    if indices.iter().enumerate().any(|(expected, &found)| expected != found) {
        errors.push(ValidationError::NonContiguousIndices {
            command: command.name.clone(),
            found: indices,
        });
        return errors;
    }

    errors.extend(validate_flags(command));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_positionals(command));
    if !errors.is_empty() {
        return errors;
    }

    for option in &command.options {
        if let Err(err) = option.prompt_type.compile() {
            errors.push(ValidationError::InvalidPattern {
                command: command.name.clone(),
                option: option.canonical_name(),
                reason: err.to_string(),
            });
            return errors;
        }
    }

    errors
}

fn validate_flags(command: &CommandMetadata) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for option in command.options.iter().filter(|o| o.is_named()) {
        if option.short.is_none() && option.long.is_none() {
            errors.push(ValidationError::MissingFlagName(
                command.name.clone(),
                option.index,
            ));
            return errors;
        }

        if let Some(short) = &option.short {
            if !is_short_flag(short) {
                errors.push(ValidationError::InvalidShortFlag(short.clone()));
                return errors;
            }
            if !seen.insert(short.clone()) {
                errors.push(ValidationError::DuplicateFlag(short.clone()));
                return errors;
            }
        }

        if let Some(long) = &option.long {
            if !is_long_flag(long) {
                errors.push(ValidationError::InvalidLongFlag(long.clone()));
                return errors;
            }
            if !seen.insert(long.clone()) {
                errors.push(ValidationError::DuplicateFlag(long.clone()));
                return errors;
            }
        }

        if option.kind == OptionKind::NamedBoolean && option.value_type != ValueType::Boolean {
            errors.push(ValidationError::BooleanFlagType(
                command.name.clone(),
                option.canonical_name(),
            ));
            return errors;
        }
    }

    errors
}

fn is_short_flag(flag: &str) -> bool {
    is_flag_shaped(flag) && !flag.starts_with("--")
}

fn is_long_flag(flag: &str) -> bool {
    is_flag_shaped(flag) && flag.starts_with("--")
}

fn validate_positionals(command: &CommandMetadata) -> Vec<ValidationError> {
    let ordered: Vec<&OptionMetadata> = command.ordered_options();
    let varargs = ordered
        .iter()
        .filter(|o| o.kind == OptionKind::OrderedVarargs)
        .count();
    let last_is_varargs = ordered
        .last()
        .is_some_and(|o| o.kind == OptionKind::OrderedVarargs);

    if varargs > 1 || (varargs == 1 && !last_is_varargs) {
        return vec![ValidationError::MisplacedOrderedVarargs(
            command.name.clone(),
        )];
    }
    Vec::new()
}
