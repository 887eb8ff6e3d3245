//! Error taxonomy for loading, mutating and persisting the global configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by the configuration store or the mutation engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Persisted storage exists but could not be read or parsed
    #[error("global config {} is unreadable or malformed: {reason}", .path.display())]
    CorruptConfig { path: PathBuf, reason: String },

    /// An operation named an option outside the catalog
    #[error("unknown global config option '{name}'")]
    UnknownOption { name: String },

    /// A value failed to parse or validate for its option
    #[error("invalid value '{value}' for '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    /// Persisting the store failed
    #[error("failed to write global config {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(name: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller may recover by starting from defaults
    pub fn is_corrupt(&self) -> bool {
        matches!(self, ConfigError::CorruptConfig { .. })
    }
}
