//! Plugin registry snapshots and shell configuration.
//!
//! This crate loads the read-only plugin metadata a resolver works against
//! from directories and bundle files, and the YAML configuration of the
//! interactive shell.
//!
//! # Quick start
//!
//! ```no_run
//! use plugin_shell_registry::{PluginRegistry, ShellConfig};
//!
//! // Load plugins from a directory
//! let registry = PluginRegistry::from_dir("plugins/").unwrap();
//! if let Some(plugin) = registry.get("project") {
//!     println!("project has {} commands", plugin.commands.len());
//! }
//!
//! // Or let the configuration name the sources
//! let config = ShellConfig::load("shell.yaml").unwrap();
//! let registry = config.load_registry().unwrap();
//! ```

mod config;
mod error;
mod loader;

pub use config::{DEFAULT_PROMPT, ShellConfig};
pub use error::{RegistryError, Result};
pub use loader::{PluginRegistry, RegistryBuilder, RegistrySource};
