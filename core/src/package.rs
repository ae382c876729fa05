use serde::{Deserialize, Serialize};

use crate::PluginMetadata;

/// Serializable bundle of plugin metadata.
///
/// A package groups several [`PluginMetadata`] values with version metadata,
/// so a whole registry can be shipped as one JSON or YAML file.
///
/// # Examples
///
/// ```
/// use plugin_shell_core::*;
///
/// let mut package = PluginPackage::new("1.0.0");
/// package.name = Some("builtin".into());
/// package.plugins.push(PluginMetadata::new("project"));
/// package.plugins.push(PluginMetadata::new("deploy"));
///
/// assert_eq!(package.plugin_count(), 2);
/// assert_eq!(package.version, "1.0.0");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginPackage {
    /// Metadata contract version (populated from
    /// [`METADATA_CONTRACT_VERSION`](crate::METADATA_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_version: Option<String>,
    /// Package format version (semver string).
    pub version: String,
    /// Optional package name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional package description.
    #[serde(default)]
    pub description: Option<String>,
    /// Plugins included in this package.
    #[serde(default)]
    pub plugins: Vec<PluginMetadata>,
}

impl PluginPackage {
    /// Creates an empty package.
    ///
    /// The `contract_version` is set from
    /// [`METADATA_CONTRACT_VERSION`](crate::METADATA_CONTRACT_VERSION).
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            contract_version: Some(crate::METADATA_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            plugins: Vec::new(),
        }
    }

    /// Returns the number of plugins in this package.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }
}
