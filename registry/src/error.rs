//! Error types for plugin registry operations.
//!
//! Provides a unified error type covering all failure modes of loading a
//! registry snapshot: I/O, serialization, and metadata validation.

use thiserror::Error;

/// Errors that can occur while loading a registry or its configuration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Plugin metadata failed structural validation.
    #[error("invalid plugin {plugin}: {reason}")]
    InvalidPlugin { plugin: String, reason: String },

    /// The builder was given no sources.
    #[error("no plugin sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
