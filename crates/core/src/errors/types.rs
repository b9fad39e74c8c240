//! Core error type definitions

use std::fmt;
use std::path::PathBuf;

/// Result type alias for envsnag operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for envsnag operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source string could not be parsed into a descriptor
    #[error("invalid source '{input}': {message}")]
    SourceParse { input: String, message: String },

    /// A source failed to resolve; wraps the backend-specific cause
    #[error("{cause}")]
    Resolution {
        descriptor: String,
        #[source]
        cause: Box<Error>,
    },

    /// No resolver is registered for the scheme
    #[error("no resolver registered for scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },

    /// The locator does not exist in the backend
    #[error("'{locator}' not found")]
    NotFound { locator: String },

    /// Backend client or transport failure
    #[error("{backend} error: {message}")]
    Backend { backend: String, message: String },

    /// A backend returned a body that could not be decoded
    #[error("could not decode '{locator}': {message}")]
    Decode { locator: String, message: String },

    /// Manifest document problems
    #[error("manifest '{}': {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// Unknown output format requested
    #[error("No formatter found for '{name}'")]
    FormatterNotFound { name: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{}': {source}", path.display())]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The run was cancelled from outside
    #[error("interrupted")]
    Interrupted,
}

/// Non-fatal notice that a resolved entry was dropped during key normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNormalizationWarning {
    pub origin: String,
    pub key: String,
    pub reason: String,
}

impl fmt::Display for KeyNormalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "warning: dropping key '{}' from {}: {}",
            self.key, self.origin, self.reason
        )
    }
}
