//! Line-level resolution: tokens to plugin, command and parameters.

use plugin_shell_core::{CommandMetadata, Execution, PluginMetadata, PluginSource};
use tracing::{debug, warn};

use crate::error::{CommandResolutionError, ResolutionError, Result};
use crate::parser::CompositeParser;
use crate::resolve::ParameterResolver;
use crate::shell::Shell;
use crate::tokenizer::{ShellWordsTokenizer, Tokenizer};

/// Resolves raw input lines against a plugin source.
///
/// The first token names the plugin, the second optionally names one of its
/// commands. A plugin's default command, when declared, is always selected
/// in place of a named match. Remaining tokens go through the
/// [`CompositeParser`] and the resulting values through a
/// [`ParameterResolver`], which may prompt on the shell.
///
/// Unknown plugins and empty lines are not errors: they yield an
/// unresolved [`Execution`] so the caller can try other handlers.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use plugin_shell_core::{CommandMetadata, OptionMetadata, Parameter, PluginMetadata};
/// use plugin_shell_resolver::{ExecutionParser, ScriptedShell};
///
/// let mut plugins = BTreeMap::new();
/// plugins.insert(
///     "project".to_string(),
///     PluginMetadata::new("project").with_command(
///         CommandMetadata::new("create")
///             .with_option(OptionMetadata::named_value(Some("-n"), Some("--name"))),
///     ),
/// );
///
/// let mut parser = ExecutionParser::new(&plugins, ScriptedShell::default());
/// let execution = parser.parse("project create -n demo").unwrap();
///
/// assert_eq!(execution.command().unwrap().name, "create");
/// assert_eq!(execution.parameter(0), Some(&Parameter::Text("demo".into())));
/// assert!(!parser.parse("unknown thing").unwrap().is_resolved());
/// ```
pub struct ExecutionParser<'r, P, S, T = ShellWordsTokenizer>
where
    P: PluginSource + ?Sized,
{
    plugins: &'r P,
    shell: S,
    tokenizer: T,
    parser: CompositeParser,
    strict: bool,
}

impl<'r, P, S> ExecutionParser<'r, P, S>
where
    P: PluginSource + ?Sized,
    S: Shell,
{
    /// Creates a strict parser using the shell-words tokenizer and the
    /// standard strategy chain.
    pub fn new(plugins: &'r P, shell: S) -> Self {
        Self {
            plugins,
            shell,
            tokenizer: ShellWordsTokenizer,
            parser: CompositeParser::standard(),
            strict: true,
        }
    }
}

impl<'r, P, S, T> ExecutionParser<'r, P, S, T>
where
    P: PluginSource + ?Sized,
    S: Shell,
    T: Tokenizer,
{
    /// Replaces the tokenizer.
    pub fn with_tokenizer<U: Tokenizer>(self, tokenizer: U) -> ExecutionParser<'r, P, S, U> {
        ExecutionParser {
            plugins: self.plugins,
            shell: self.shell,
            tokenizer,
            parser: self.parser,
            strict: self.strict,
        }
    }

    /// Replaces the option parser chain.
    pub fn with_parser(mut self, parser: CompositeParser) -> Self {
        self.parser = parser;
        self
    }

    /// In strict mode (the default) unrecognized tokens abort resolution.
    /// Otherwise each is reported on the shell and resolution continues.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn into_shell(self) -> S {
        self.shell
    }

    /// Resolves one input line.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::Tokenize`] if the line cannot be split.
    /// - [`ResolutionError::CommandResolution`] if the plugin matched but no
    ///   command could be selected.
    /// - [`ResolutionError::Parse`] for unrecognized tokens in strict mode.
    /// - [`ResolutionError::Shell`] if prompting failed.
    pub fn parse(&mut self, line: &str) -> Result<Execution<'r>> {
        let tokens = self.tokenizer.tokenize(line)?;
        let builder = Execution::builder(line);

        let Some((plugin_name, rest)) = tokens.split_first() else {
            return Ok(builder.build());
        };

        let plugins: &'r P = self.plugins;
        let Some(plugin) = plugins.plugin(plugin_name) else {
            debug!(plugin = %plugin_name, "no plugin matches input");
            return Ok(builder.build());
        };

        let (command, rest) = select_command(plugin, rest)?;
        debug!(plugin = %plugin.name, command = %command.name, "selected command");

        let parsed = self.parser.parse(command, rest);
        if !parsed.is_clean() {
            if self.strict {
                return Err(ResolutionError::Parse(parsed.errors().to_vec()));
            }
            for error in parsed.errors() {
                warn!(command = %command.name, %error, "ignoring unrecognized token");
                self.shell.println(&error.to_string())?;
            }
        }

        let parameters = ParameterResolver::new(&mut self.shell).resolve(command, parsed)?;
        Ok(builder.command(plugin, command).parameters(parameters).build())
    }
}

/// Picks the command for `plugin` from the tokens after the plugin name.
///
/// A token naming a command is consumed even when the default command wins.
fn select_command<'r, 't>(
    plugin: &'r PluginMetadata,
    tokens: &'t [String],
) -> std::result::Result<(&'r CommandMetadata, &'t [String]), CommandResolutionError> {
    let named = tokens
        .split_first()
        .and_then(|(first, rest)| plugin.command(first).map(|command| (command, rest)));

    let rest = named.map_or(tokens, |(_, rest)| rest);
    match (plugin.default_command.as_ref(), named) {
        (Some(default), _) => Ok((default, rest)),
        (None, Some((command, _))) => Ok((command, rest)),
        (None, None) => Err(CommandResolutionError {
            plugin: plugin.name.clone(),
            available: plugin.command_names().into_iter().map(String::from).collect(),
        }),
    }
}
