//! Reconciling parsed values with option metadata.
//!
//! For every declared option, in index order, the [`ParameterResolver`]
//! either accepts the parsed value, replaces an invalid one through a single
//! corrective prompt, prompts until a missing required value is supplied,
//! or falls back to the declared default.

use std::path::PathBuf;

use plugin_shell_core::{CommandMetadata, OptionMetadata, Parameter};
use tracing::debug;

use crate::parser::{ParsedOptions, RawValue};
use crate::shell::{Shell, ShellError, parse_yes};

/// Printed before the loop asks again for a required value.
pub const REQUIRED_MESSAGE: &str = "The option is required to execute this command.";

/// Fills one parameter slot per declared option, prompting through a
/// [`Shell`] where needed.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::{CommandMetadata, OptionMetadata, Parameter};
/// use plugin_shell_resolver::parser::CompositeParser;
/// use plugin_shell_resolver::{ParameterResolver, ScriptedShell};
///
/// let command = CommandMetadata::new("create")
///     .with_option(OptionMetadata::named_value(None, Some("--name")).required())
///     .with_option(OptionMetadata::ordered_value().with_default("."));
///
/// let parsed = CompositeParser::standard().parse(&command, &[]);
/// let mut shell = ScriptedShell::new(["demo"]);
/// let parameters = ParameterResolver::new(&mut shell)
///     .resolve(&command, parsed)
///     .unwrap();
///
/// assert_eq!(
///     parameters,
///     vec![Some(Parameter::Text("demo".into())), Some(Parameter::Text(".".into()))]
/// );
/// ```
pub struct ParameterResolver<'s, S: Shell + ?Sized> {
    shell: &'s mut S,
}

impl<'s, S: Shell + ?Sized> ParameterResolver<'s, S> {
    pub fn new(shell: &'s mut S) -> Self {
        Self { shell }
    }

    /// Resolves every option of `command`.
    ///
    /// The returned vector has exactly `command.option_count()` slots;
    /// `slots[i]` belongs to the option whose index is `i`.
    ///
    /// # Errors
    ///
    /// Returns the [`ShellError`] of a failed prompt or print.
    pub fn resolve(
        &mut self,
        command: &CommandMetadata,
        mut parsed: ParsedOptions,
    ) -> Result<Vec<Option<Parameter>>, ShellError> {
        let mut options: Vec<&OptionMetadata> = command.options.iter().collect();
        options.sort_by_key(|o| o.index);

        let mut parameters = vec![None; command.option_count()];
        for option in options {
            let value = self.resolve_option(option, parsed.take(option.index))?;
            if let Some(slot) = parameters.get_mut(option.index) {
                *slot = value;
            }
        }
        Ok(parameters)
    }

    fn resolve_option(
        &mut self,
        option: &OptionMetadata,
        raw: Option<RawValue>,
    ) -> Result<Option<Parameter>, ShellError> {
        let label = format!("{}: ", option.descriptor());

        match raw {
            Some(raw) if !raw.matches(&option.prompt_type) => {
                debug!(option = %option.canonical_name(), value = %raw, "value failed validation");
                self.shell
                    .println(&format!("Could not parse [{raw}]... please try again..."))?;
                let corrected = self.shell.prompt_common(&label, &option.prompt_type)?;
                Ok(Some(corrected_parameter(option, corrected)))
            }
            Some(raw) => Ok(Some(typed_parameter(option, raw))),
            None if option.required && !option.has_default() => {
                self.prompt_required(option, &label).map(Some)
            }
            None => Ok(option.default_value.clone().map(Parameter::Text)),
        }
    }

    fn prompt_required(
        &mut self,
        option: &OptionMetadata,
        label: &str,
    ) -> Result<Parameter, ShellError> {
        loop {
            let value = if option.is_boolean() {
                Parameter::Bool(self.shell.prompt_boolean(label)?)
            } else if option.is_file() {
                Parameter::Path(self.shell.prompt_file(label)?)
            } else if !option.prompt_type.is_any() {
                Parameter::Text(self.shell.prompt_common(label, &option.prompt_type)?)
            } else {
                Parameter::Text(self.shell.prompt(label)?)
            };

            if !value.is_blank() {
                return Ok(value);
            }
            self.shell.println(REQUIRED_MESSAGE)?;
        }
    }
}

// Parsed values take the same shape as prompted ones.
fn typed_parameter(option: &OptionMetadata, raw: RawValue) -> Parameter {
    match raw {
        RawValue::Single(value) if option.is_boolean() => Parameter::Bool(parse_yes(&value)),
        RawValue::Single(value) if option.is_file() => Parameter::Path(PathBuf::from(value)),
        raw => raw.into(),
    }
}

// Vararg options keep their sequence shape after correction.
fn corrected_parameter(option: &OptionMetadata, corrected: String) -> Parameter {
    if option.is_vararg() {
        Parameter::List(corrected.split_whitespace().map(String::from).collect())
    } else {
        Parameter::Text(corrected)
    }
}
