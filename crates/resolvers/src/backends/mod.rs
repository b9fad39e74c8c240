//! Backend capabilities
//!
//! Resolvers depend only on these traits. Production implementations live in
//! [`aws`] and [`vault`]; in-memory doubles live in [`crate::testing`].

pub mod aws;
pub mod vault;

use async_trait::async_trait;
use envsnag_core::{Result, SourceDescriptor};

/// Per-request options taken from a descriptor's query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreScope {
    pub region: Option<String>,
    pub version_stage: Option<String>,
    pub version_id: Option<String>,
}

impl StoreScope {
    #[must_use]
    pub fn from_descriptor(descriptor: &SourceDescriptor) -> Self {
        let param = |name: &str| {
            descriptor
                .query(name)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            region: param("region"),
            version_stage: param("version-stage"),
            version_id: param("version-id"),
        }
    }

    #[must_use]
    pub fn with_region(region: Option<String>) -> Self {
        Self {
            region,
            ..Self::default()
        }
    }
}

/// A store of named secrets whose bodies are opaque strings
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Names of secrets that may live under `prefix`.
    ///
    /// Implementations may over-report; callers filter by prefix.
    async fn list_secrets(&self, prefix: &str, scope: &StoreScope) -> Result<Vec<String>>;

    /// The raw body of one secret. Missing secrets are [`envsnag_core::Error::NotFound`].
    async fn get_secret(&self, name: &str, scope: &StoreScope) -> Result<String>;
}

/// One parameter from a hierarchical parameter store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Full path, e.g. `/app/prod/db/url`
    pub name: String,
    /// Decrypted value
    pub value: String,
}

#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Parameters directly under `path`, or anywhere beneath it when `recursive`
    async fn parameters_by_path(
        &self,
        path: &str,
        recursive: bool,
        scope: &StoreScope,
    ) -> Result<Vec<Parameter>>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// The full body of one object
    async fn get_object(&self, bucket: &str, key: &str, scope: &StoreScope) -> Result<Vec<u8>>;
}
