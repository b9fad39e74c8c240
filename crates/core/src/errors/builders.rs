//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

impl Error {
    /// Create a source parse error
    #[must_use]
    pub fn source_parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SourceParse {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Wrap a cause as the resolution failure of a descriptor.
    ///
    /// Already-wrapped errors are returned untouched so nested manifests keep
    /// the innermost source in the message.
    #[must_use]
    pub fn resolution(descriptor: impl Into<String>, cause: Error) -> Self {
        match cause {
            Error::Resolution { .. } => cause,
            cause => Error::Resolution {
                descriptor: descriptor.into(),
                cause: Box::new(cause),
            },
        }
    }

    /// Create an unsupported scheme error
    #[must_use]
    pub fn unsupported_scheme(scheme: impl Into<String>) -> Self {
        Error::UnsupportedScheme {
            scheme: scheme.into(),
        }
    }

    /// Create a not found error
    #[must_use]
    pub fn not_found(locator: impl Into<String>) -> Self {
        Error::NotFound {
            locator: locator.into(),
        }
    }

    /// Create a backend error
    #[must_use]
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    #[must_use]
    pub fn decode(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Decode {
            locator: locator.into(),
            message: message.into(),
        }
    }

    /// Create a manifest error
    #[must_use]
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a formatter not found error
    #[must_use]
    pub fn formatter_not_found(name: impl Into<String>) -> Self {
        Error::FormatterNotFound { name: name.into() }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// The descriptor that failed, for resolution errors
    #[must_use]
    pub fn descriptor(&self) -> Option<&str> {
        match self {
            Error::Resolution { descriptor, .. } => Some(descriptor),
            _ => None,
        }
    }
}
