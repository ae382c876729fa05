//! Resolved invocation of a plugin command.
//!
//! An [`Execution`] is the immutable result of resolving one input line: the
//! original text, the plugin and command it selected (if any), and one
//! parameter slot per declared option. It is assembled once through an
//! [`ExecutionBuilder`] and only read afterwards.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::{CommandMetadata, PluginMetadata};

/// Resolved value stored in a parameter slot.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::Parameter;
///
/// let list = Parameter::List(vec!["a".into(), "b".into()]);
/// assert_eq!(list.as_text(), "a b");
/// assert!(Parameter::Text("  ".into()).is_blank());
/// assert!(!Parameter::Bool(false).is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Parameter {
    /// Single textual value.
    Text(String),
    /// Ordered values of a vararg option.
    List(Vec<String>),
    /// Answer to a yes/no prompt.
    Bool(bool),
    /// Answer to a file prompt.
    Path(PathBuf),
}

impl Parameter {
    /// Textual form: list elements are joined by a single space.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(value) => Cow::Borrowed(value),
            Self::List(values) => Cow::Owned(values.join(" ")),
            Self::Bool(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
            Self::Path(path) => path.to_string_lossy(),
        }
    }

    /// Returns `true` when the trimmed textual form is empty.
    pub fn is_blank(&self) -> bool {
        self.as_text().trim().is_empty()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Boolean view; `"true"` text (set by a boolean flag) counts as `true`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Text(value) => value.parse().ok(),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<PathBuf> {
        match self {
            Self::Path(path) => Some(path.clone()),
            Self::Text(value) => Some(PathBuf::from(value)),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Fully resolved command line, ready to dispatch.
///
/// When no plugin matched (or the line was empty) the execution carries only
/// the original statement; callers must check [`is_resolved`](Self::is_resolved).
///
/// # Examples
///
/// ```
/// use plugin_shell_core::Execution;
///
/// let execution = Execution::builder("nothing here").build();
/// assert!(!execution.is_resolved());
/// assert_eq!(execution.original_statement(), "nothing here");
/// assert!(execution.parameters().is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Execution<'r> {
    original_statement: String,
    #[serde(serialize_with = "serialize_plugin_name")]
    plugin: Option<&'r PluginMetadata>,
    #[serde(serialize_with = "serialize_command_name")]
    command: Option<&'r CommandMetadata>,
    parameters: Vec<Option<Parameter>>,
}

impl<'r> Execution<'r> {
    /// Starts building an execution for `statement`.
    pub fn builder(statement: impl Into<String>) -> ExecutionBuilder<'r> {
        ExecutionBuilder {
            execution: Execution {
                original_statement: statement.into(),
                plugin: None,
                command: None,
                parameters: Vec::new(),
            },
        }
    }

    /// The raw line exactly as typed.
    pub fn original_statement(&self) -> &str {
        &self.original_statement
    }

    pub fn plugin(&self) -> Option<&'r PluginMetadata> {
        self.plugin
    }

    pub fn command(&self) -> Option<&'r CommandMetadata> {
        self.command
    }

    /// Returns `true` if a command was selected.
    pub fn is_resolved(&self) -> bool {
        self.command.is_some()
    }

    /// One slot per declared option, indexed by `OptionMetadata::index`.
    pub fn parameters(&self) -> &[Option<Parameter>] {
        &self.parameters
    }

    /// Value in slot `index`, if set.
    pub fn parameter(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index).and_then(Option::as_ref)
    }
}

/// Write-once builder used by the resolver to assemble an [`Execution`].
#[derive(Debug)]
pub struct ExecutionBuilder<'r> {
    execution: Execution<'r>,
}

impl<'r> ExecutionBuilder<'r> {
    /// Records the selected plugin and command and sizes the parameter array
    /// to the command's option count.
    pub fn command(mut self, plugin: &'r PluginMetadata, command: &'r CommandMetadata) -> Self {
        self.execution.plugin = Some(plugin);
        self.execution.command = Some(command);
        self.execution.parameters = vec![None; command.option_count()];
        self
    }

    /// Stores the resolved parameters.
    ///
    /// Slots beyond the selected command's option count are dropped; missing
    /// slots stay empty.
    pub fn parameters(mut self, parameters: Vec<Option<Parameter>>) -> Self {
        for (slot, value) in self.execution.parameters.iter_mut().zip(parameters) {
            *slot = value;
        }
        self
    }

    pub fn build(self) -> Execution<'r> {
        self.execution
    }
}

fn serialize_plugin_name<S: Serializer>(
    plugin: &Option<&PluginMetadata>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    plugin.map(|p| p.name.as_str()).serialize(serializer)
}

fn serialize_command_name<S: Serializer>(
    command: &Option<&CommandMetadata>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    command.map(|c| c.name.as_str()).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionMetadata;

    fn sample_plugin() -> PluginMetadata {
        PluginMetadata::new("project").with_command(
            CommandMetadata::new("create")
                .with_option(OptionMetadata::named_value(None, Some("--name")))
                .with_option(OptionMetadata::ordered_value()),
        )
    }

    #[test]
    fn test_builder_sizes_parameters_to_option_count() {
        let plugin = sample_plugin();
        let command = plugin.command("create").unwrap();

        let execution = Execution::builder("project create").command(&plugin, command).build();
        assert!(execution.is_resolved());
        assert_eq!(execution.parameters().len(), 2);
        assert!(execution.parameters().iter().all(Option::is_none));
    }

    #[test]
    fn test_builder_ignores_surplus_parameters() {
        let plugin = sample_plugin();
        let command = plugin.command("create").unwrap();

        let execution = Execution::builder("project create")
            .command(&plugin, command)
            .parameters(vec![
                Some(Parameter::Text("a".into())),
                None,
                Some(Parameter::Text("surplus".into())),
            ])
            .build();
        assert_eq!(execution.parameters().len(), 2);
        assert_eq!(execution.parameter(0), Some(&Parameter::Text("a".into())));
        assert_eq!(execution.parameter(1), None);
    }

    #[test]
    fn test_execution_serializes_names_only() {
        let plugin = sample_plugin();
        let command = plugin.command("create").unwrap();
        let execution = Execution::builder("project create --name demo x")
            .command(&plugin, command)
            .parameters(vec![
                Some(Parameter::Text("demo".into())),
                Some(Parameter::List(vec!["x".into()])),
            ])
            .build();

        let json = serde_json::to_value(&execution).unwrap();
        assert_eq!(json["plugin"], "project");
        assert_eq!(json["command"], "create");
        assert_eq!(json["original_statement"], "project create --name demo x");
        assert_eq!(json["parameters"], serde_json::json!(["demo", ["x"]]));
    }

    #[test]
    fn test_unresolved_execution_serializes_nulls() {
        let execution = Execution::builder("").build();
        let json = serde_json::to_value(&execution).unwrap();
        assert!(json["plugin"].is_null());
        assert!(json["command"].is_null());
    }

    #[test]
    fn test_parameter_views() {
        assert_eq!(Parameter::Text("true".into()).as_bool(), Some(true));
        assert_eq!(Parameter::Bool(false).as_text(), "false");
        assert_eq!(
            Parameter::Path(PathBuf::from("a/b")).as_path(),
            Some(PathBuf::from("a/b"))
        );
        assert!(Parameter::Path(PathBuf::new()).is_blank());
        assert!(Parameter::List(Vec::new()).is_blank());
    }
}
