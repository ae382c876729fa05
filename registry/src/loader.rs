//! Plugin registry loading with a builder for combining sources.
//!
//! Provides [`PluginRegistry`], the read-only snapshot of plugin metadata a
//! resolver works against, and [`RegistryBuilder`] for assembling one from
//! several files or directories.
//!
//! # Loading patterns
//!
//! ```no_run
//! use plugin_shell_registry::PluginRegistry;
//!
//! // Load from a directory of plugin files (*.json, *.yaml, *.yml)
//! let registry = PluginRegistry::from_dir("plugins/").unwrap();
//! assert!(registry.get("project").is_some());
//!
//! // Load from a single PluginPackage bundle
//! let registry = PluginRegistry::from_bundle("plugins.json").unwrap();
//!
//! // Merge several sources; later sources replace earlier plugins
//! let registry = PluginRegistry::builder()
//!     .from_dir("plugins/")
//!     .from_bundle("extra.yaml")
//!     .build()
//!     .unwrap();
//! ```
//!
//! Every load validates the plugin metadata; a registry never holds a plugin
//! that the resolver could not index correctly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use plugin_shell_core::{
    PluginMetadata, PluginPackage, PluginSource, validate_plugin, validate_plugins,
};
use serde::de::DeserializeOwned;

use crate::error::{RegistryError, Result};

/// Describes where a [`PluginRegistry`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    /// Built in memory.
    InMemory,
    /// Loaded from a directory of individual plugin files.
    Directory(PathBuf),
    /// Loaded from a single [`PluginPackage`] file.
    Bundle(PathBuf),
    /// Merged from several sources, in order.
    Multiple(Vec<RegistrySource>),
}

/// Read-only snapshot of plugin metadata keyed by plugin name.
///
/// Lookups go through a [`BTreeMap`], so iteration and listings are sorted by
/// plugin name.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::{CommandMetadata, PluginMetadata};
/// use plugin_shell_registry::PluginRegistry;
///
/// let mut registry = PluginRegistry::new();
/// registry
///     .insert(PluginMetadata::new("project").with_command(CommandMetadata::new("create")))
///     .unwrap();
///
/// assert_eq!(registry.len(), 1);
/// assert!(registry.get("project").unwrap().command("create").is_some());
/// assert_eq!(registry.names().collect::<Vec<_>>(), vec!["project"]);
/// ```
#[derive(Debug, Clone)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, PluginMetadata>,
    source: RegistrySource,
}

impl PluginRegistry {
    /// Creates an empty in-memory registry.
    pub fn new() -> Self {
        Self {
            plugins: BTreeMap::new(),
            source: RegistrySource::InMemory,
        }
    }

    /// Returns a new [`RegistryBuilder`].
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builds an in-memory registry from plugins, validating all of them.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidPlugin`] for the first plugin that
    /// fails validation, including duplicate plugin names.
    pub fn from_plugins(plugins: Vec<PluginMetadata>) -> Result<Self> {
        check_plugins(&plugins)?;
        let mut registry = Self::new();
        for plugin in plugins {
            registry.plugins.insert(plugin.name.clone(), plugin);
        }
        Ok(registry)
    }

    /// Loads plugins from a directory; each `*.json`, `*.yaml` or `*.yml`
    /// file holds one [`PluginMetadata`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IoError`] if the directory or a file cannot
    /// be read, a JSON/YAML error if a file does not parse, or
    /// [`RegistryError::InvalidPlugin`] if validation fails.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        files.sort();

        let mut plugins = Vec::new();
        for file_path in files {
            if format_of(&file_path).is_some() {
                plugins.push(read_document::<PluginMetadata>(&file_path)?);
            }
        }

        let mut registry = Self::from_plugins(plugins)?;
        registry.source = RegistrySource::Directory(path.to_path_buf());
        tracing::debug!(
            path = %path.display(),
            plugins = registry.len(),
            "loaded plugin directory"
        );
        Ok(registry)
    }

    /// Loads plugins from a single [`PluginPackage`] JSON or YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IoError`] if the file cannot be read, a
    /// JSON/YAML error if parsing fails, or [`RegistryError::InvalidPlugin`]
    /// if validation fails.
    pub fn from_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let package: PluginPackage = read_document(path)?;

        let mut registry = Self::from_plugins(package.plugins)?;
        registry.source = RegistrySource::Bundle(path.to_path_buf());
        tracing::debug!(
            path = %path.display(),
            version = %package.version,
            plugins = registry.len(),
            "loaded plugin bundle"
        );
        Ok(registry)
    }

    /// Loads from a directory or a bundle file, depending on what `path` is.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_bundle(path)
        }
    }

    /// Inserts a plugin, replacing any existing plugin of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidPlugin`] if the plugin fails
    /// validation; the registry is left unchanged.
    pub fn insert(&mut self, plugin: PluginMetadata) -> Result<()> {
        if let Some(err) = validate_plugin(&plugin).into_iter().next() {
            return Err(RegistryError::InvalidPlugin {
                plugin: plugin.name,
                reason: err.to_string(),
            });
        }
        self.plugins.insert(plugin.name.clone(), plugin);
        Ok(())
    }

    /// Looks up a plugin by name.
    pub fn get(&self, name: &str) -> Option<&PluginMetadata> {
        self.plugins.get(name)
    }

    /// Returns `true` if a plugin with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// All plugins keyed by name.
    pub fn plugins(&self) -> &BTreeMap<String, PluginMetadata> {
        &self.plugins
    }

    /// Returns an iterator over plugin names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(|s| s.as_str())
    }

    /// Returns the number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Returns where this registry came from.
    pub fn source(&self) -> &RegistrySource {
        &self.source
    }

    fn merge(&mut self, other: PluginRegistry) {
        for (name, plugin) in other.plugins {
            if self.plugins.insert(name.clone(), plugin).is_some() {
                tracing::debug!(plugin = %name, "plugin replaced by later source");
            }
        }
    }
}

impl PluginSource for PluginRegistry {
    fn plugin(&self, name: &str) -> Option<&PluginMetadata> {
        self.get(name)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder that merges several registry sources.
///
/// Sources load in the order they are added. A plugin from a later source
/// replaces an earlier plugin with the same name. Any failing source fails
/// the build.
///
/// # Example
///
/// ```no_run
/// use plugin_shell_registry::PluginRegistry;
///
/// let registry = PluginRegistry::builder()
///     .from_dir("/opt/plugins/")
///     .from_path("./local-plugins.yaml")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    sources: Vec<PathBuf>,
}

impl RegistryBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory of plugin files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Adds a [`PluginPackage`] bundle file as a source.
    pub fn from_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Adds a directory or bundle file, detected when the registry is built.
    pub fn from_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Loads every source in order and merges the results.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoSourcesAvailable`] when no source was
    /// added, or the first error raised by a source.
    pub fn build(self) -> Result<PluginRegistry> {
        if self.sources.is_empty() {
            return Err(RegistryError::NoSourcesAvailable);
        }

        let mut registry = PluginRegistry::new();
        let mut loaded = Vec::new();
        for path in &self.sources {
            let next = PluginRegistry::from_path(path)?;
            loaded.push(next.source.clone());
            registry.merge(next);
        }
        registry.source = RegistrySource::Multiple(loaded);
        Ok(registry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Option<DocumentFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(DocumentFormat::Json),
        Some("yaml" | "yml") => Some(DocumentFormat::Yaml),
        _ => None,
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    match format_of(path) {
        Some(DocumentFormat::Yaml) => Ok(serde_yaml::from_reader(reader)?),
        _ => Ok(serde_json::from_reader(reader)?),
    }
}

fn check_plugins(plugins: &[PluginMetadata]) -> Result<()> {
    match validate_plugins(plugins).into_iter().next() {
        None => Ok(()),
        Some(err) => {
            let plugin = match &err {
                plugin_shell_core::ValidationError::DuplicatePlugin(name) => name.clone(),
                _ => plugins
                    .iter()
                    .find(|p| !validate_plugin(p).is_empty())
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
            };
            Err(RegistryError::InvalidPlugin {
                plugin,
                reason: err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_shell_core::{CommandMetadata, OptionMetadata};
    use std::io::Write;

    fn test_plugin(name: &str) -> PluginMetadata {
        PluginMetadata::new(name).with_command(
            CommandMetadata::new("run").with_option(OptionMetadata::ordered_value()),
        )
    }

    fn write_plugin(dir: &Path, plugin: &PluginMetadata) {
        let path = dir.join(format!("{}.json", plugin.name));
        let mut f = std::fs::File::create(path).unwrap();
        serde_json::to_writer_pretty(&mut f, plugin).unwrap();
        f.flush().unwrap();
    }

    #[test]
    fn test_from_dir_reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(dir.path(), &test_plugin("project"));
        std::fs::write(
            dir.path().join("deploy.yaml"),
            "name: deploy\ncommands:\n  - name: push\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("README.md"), "ignored").unwrap();

        let registry = PluginRegistry::from_dir(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("project"));
        assert!(registry.get("deploy").unwrap().command("push").is_some());
        assert_eq!(
            registry.source(),
            &RegistrySource::Directory(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_from_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");

        let mut package = PluginPackage::new("1.0.0");
        package.plugins.push(test_plugin("project"));
        package.plugins.push(test_plugin("deploy"));
        std::fs::write(&path, serde_json::to_string_pretty(&package).unwrap()).unwrap();

        let registry = PluginRegistry::from_bundle(&path).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["deploy", "project"]);
    }

    #[test]
    fn test_from_plugins_rejects_duplicates() {
        let err = PluginRegistry::from_plugins(vec![test_plugin("a"), test_plugin("a")])
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidPlugin { ref plugin, .. } if plugin == "a"
        ));
    }

    #[test]
    fn test_from_plugins_names_invalid_plugin() {
        let mut broken = test_plugin("broken");
        broken.commands[0].options[0].index = 3;

        let err = PluginRegistry::from_plugins(vec![test_plugin("ok"), broken]).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidPlugin { ref plugin, .. } if plugin == "broken"
        ));
    }

    #[test]
    fn test_insert_validates_and_replaces() {
        let mut registry = PluginRegistry::new();
        registry.insert(test_plugin("project")).unwrap();
        registry
            .insert(PluginMetadata::new("project").with_command(CommandMetadata::new("other")))
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("project").unwrap().command("other").is_some());

        let err = registry.insert(PluginMetadata::new("")).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPlugin { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_builder_merges_later_sources_last() {
        let first = tempfile::tempdir().unwrap();
        write_plugin(first.path(), &test_plugin("project"));
        write_plugin(first.path(), &test_plugin("deploy"));

        let second = tempfile::tempdir().unwrap();
        let bundle = second.path().join("override.json");
        let mut package = PluginPackage::new("1.0.0");
        package
            .plugins
            .push(PluginMetadata::new("project").with_command(CommandMetadata::new("status")));
        std::fs::write(&bundle, serde_json::to_string(&package).unwrap()).unwrap();

        let registry = PluginRegistry::builder()
            .from_dir(first.path())
            .from_bundle(&bundle)
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        let project = registry.get("project").unwrap();
        assert!(project.command("status").is_some());
        assert!(project.command("run").is_none());
        assert!(matches!(registry.source(), RegistrySource::Multiple(s) if s.len() == 2));
    }

    #[test]
    fn test_builder_fails_on_missing_source() {
        let result = PluginRegistry::builder()
            .from_dir("/nonexistent/plugins/")
            .build();
        assert!(matches!(result, Err(RegistryError::IoError(_))));
    }

    #[test]
    fn test_builder_without_sources() {
        assert!(matches!(
            PluginRegistry::builder().build(),
            Err(RegistryError::NoSourcesAvailable)
        ));
    }
}
