//! Resolution of raw shell input into plugin command executions.
//!
//! A line such as `project create --name demo ./out` is tokenized, matched
//! against a [`PluginSource`] to select a plugin and command, parsed into
//! option values by a chain of strategies, and finally reconciled with the
//! option metadata. Missing required values and values failing their prompt
//! pattern are completed interactively through a [`Shell`].
//!
//! # Main entry points
//!
//! - [`ExecutionParser`]: full line resolution.
//! - [`parser::CompositeParser`]: option parsing alone.
//! - [`ParameterResolver`]: validation, defaults and prompting alone.
//!
//! # Example
//!
//! ```
//! use plugin_shell_core::{CommandMetadata, OptionMetadata, Parameter, PluginMetadata};
//! use plugin_shell_resolver::{ExecutionParser, ScriptedShell};
//! use std::collections::BTreeMap;
//!
//! let plugin = PluginMetadata::new("project").with_command(
//!     CommandMetadata::new("create")
//!         .with_option(OptionMetadata::named_value(None, Some("--name")).required())
//!         .with_option(OptionMetadata::ordered_value()),
//! );
//! let plugins = BTreeMap::from([("project".to_string(), plugin)]);
//!
//! // --name is missing, so the shell is asked for it.
//! let mut parser = ExecutionParser::new(&plugins, ScriptedShell::new(["demo"]));
//! let execution = parser.parse("project create ./out").unwrap();
//!
//! assert_eq!(execution.parameter(0), Some(&Parameter::Text("demo".into())));
//! assert_eq!(execution.parameter(1), Some(&Parameter::Text("./out".into())));
//! ```
//!
//! [`PluginSource`]: plugin_shell_core::PluginSource

pub mod error;
pub mod execution;
pub mod parser;
pub mod resolve;
pub mod shell;
pub mod tokenizer;

pub use error::{CommandResolutionError, ResolutionError, Result};
pub use execution::ExecutionParser;
pub use resolve::{ParameterResolver, REQUIRED_MESSAGE};
pub use shell::{ScriptedShell, Shell, ShellCall, ShellError, StdioShell, parse_yes};
pub use tokenizer::{ShellWordsTokenizer, TokenizeError, Tokenizer};
