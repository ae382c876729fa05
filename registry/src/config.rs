//! Shell configuration loaded from YAML.
//!
//! Controls where plugin metadata comes from, the interactive prompt, and
//! whether unparseable tokens abort resolution.
//!
//! # Example YAML
//!
//! ```yaml
//! prompt: "forge> "
//! plugin_sources:
//!   - /usr/share/plugin-shell/plugins
//!   - ./plugins.yaml
//! strict_parsing: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader::PluginRegistry;

/// Default interactive prompt.
pub const DEFAULT_PROMPT: &str = "plugin-shell> ";

/// Top-level shell configuration.
///
/// Every field has a default, so an empty document is a valid configuration.
///
/// # Examples
///
/// ```
/// # use plugin_shell_registry::ShellConfig;
/// let config: ShellConfig = serde_yaml::from_str("strict_parsing: false").unwrap();
/// assert!(!config.strict_parsing);
/// assert_eq!(config.prompt, "plugin-shell> ");
/// assert!(config.plugin_sources.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt printed before each input line.
    pub prompt: String,
    /// Plugin directories or bundle files, merged in order.
    pub plugin_sources: Vec<PathBuf>,
    /// Abort resolution when a token matches no option.
    pub strict_parsing: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            plugin_sources: Vec::new(),
            strict_parsing: true,
        }
    }
}

impl ShellConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RegistryError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::RegistryError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RegistryError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::RegistryError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Loads and merges every configured plugin source.
    ///
    /// An empty source list yields an empty registry.
    pub fn load_registry(&self) -> Result<PluginRegistry> {
        if self.plugin_sources.is_empty() {
            return Ok(PluginRegistry::new());
        }
        self.plugin_sources
            .iter()
            .fold(PluginRegistry::builder(), |builder, path| {
                builder.from_path(path)
            })
            .build()
    }
}
