//! Core metadata types for declaratively described plugin commands.
//!
//! This crate defines the read-only model a plugin shell resolves input
//! against:
//!
//! - [`PluginMetadata`]: a named group of commands with an optional default
//!   command.
//! - [`CommandMetadata`]: a command and its ordered option list.
//! - [`OptionMetadata`]: one declared parameter with its [`OptionKind`],
//!   [`ValueType`], [`PromptType`] pattern, requiredness, and default.
//! - [`Execution`]: the immutable result of resolving one input line.
//! - [`PluginPackage`]: a versioned bundle of plugins for distribution.
//!
//! Validation ([`validate_command`], [`validate_plugin`],
//! [`validate_package`]) catches the structural errors the resolver cannot
//! recover from, such as gaps in option indices or malformed flags.
//!
//! # Example
//!
//! ```
//! use plugin_shell_core::*;
//!
//! let plugin = PluginMetadata::new("project").with_command(
//!     CommandMetadata::new("create")
//!         .with_option(OptionMetadata::named_boolean(Some("-f"), Some("--force")))
//!         .with_option(
//!             OptionMetadata::named_value(None, Some("--name"))
//!                 .with_prompt_type(PromptType::Identifier)
//!                 .required(),
//!         )
//!         .with_option(OptionMetadata::ordered_value().with_value_type(ValueType::File)),
//! );
//!
//! let create = plugin.command("create").unwrap();
//! assert_eq!(create.option_count(), 3);
//! assert!(create.find_named("-f").is_some());
//! assert!(validate_plugin(&plugin).is_empty());
//! ```

mod execution;
mod package;
mod types;
mod validate;

pub use execution::{Execution, ExecutionBuilder, Parameter};
pub use package::PluginPackage;
pub use types::*;
pub use validate::{
    ValidationError, validate_command, validate_package, validate_plugin, validate_plugins,
};
