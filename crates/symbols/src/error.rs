use crate::symbol::Location;
use thiserror::Error;

/// Result type for symbol extraction
pub type Result<T> = std::result::Result<T, SymbolError>;

/// Errors that can occur while building the symbol graph
#[derive(Error, Debug)]
pub enum SymbolError {
    /// A declaration has a semantic parent that could not be recorded
    #[error("Missing parent symbol for `{name}` at {location}")]
    MissingParent { name: String, location: Location },

    /// The front-end reported a type kind outside the known set
    #[error("Unmapped type kind: {0}")]
    UnmappedTypeKind(i32),

    /// Malformed AST snapshot
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SymbolError {
    /// Create a snapshot error
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a missing parent error
    pub fn missing_parent(name: impl Into<String>, location: Location) -> Self {
        Self::MissingParent {
            name: name.into(),
            location,
        }
    }

    /// Errors that abort the translation unit being processed
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingParent { .. } | Self::UnmappedTypeKind(_))
    }
}
