//! In-memory backends for tests and local experiments

use crate::backends::{ObjectStore, Parameter, ParameterStore, SecretStore, StoreScope};
use async_trait::async_trait;
use envsnag_core::{Error, Result};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Secret store backed by an ordered map.
///
/// Listing reports names in insertion order, so tests can check that callers
/// sort.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretStore {
    secrets: IndexMap<String, String>,
    versions: HashMap<(String, String), String>,
    failing: HashSet<String>,
}

impl InMemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), body.into());
        self
    }

    /// Register a body under a version stage or version id
    #[must_use]
    pub fn with_version(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.versions.insert((name.into(), version.into()), body.into());
        self
    }

    /// Make reads of `name` fail with a backend error
    #[must_use]
    pub fn failing(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn list_secrets(&self, prefix: &str, _scope: &StoreScope) -> Result<Vec<String>> {
        Ok(self
            .secrets
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get_secret(&self, name: &str, scope: &StoreScope) -> Result<String> {
        if self.failing.contains(name) {
            return Err(Error::backend("memory", format!("injected failure reading '{name}'")));
        }
        let version = scope.version_id.as_ref().or(scope.version_stage.as_ref());
        if let Some(version) = version {
            return self
                .versions
                .get(&(name.to_string(), version.clone()))
                .cloned()
                .ok_or_else(|| Error::not_found(format!("{name}@{version}")));
        }
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(name))
    }
}

/// Parameter store backed by an ordered map of full paths
#[derive(Debug, Clone, Default)]
pub struct InMemoryParameterStore {
    parameters: IndexMap<String, String>,
}

impl InMemoryParameterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameterStore {
    async fn parameters_by_path(
        &self,
        path: &str,
        recursive: bool,
        _scope: &StoreScope,
    ) -> Result<Vec<Parameter>> {
        let base = format!("{}/", path.trim_end_matches('/'));
        Ok(self
            .parameters
            .iter()
            .filter(|(name, _)| {
                name.strip_prefix(&base)
                    .is_some_and(|rest| recursive || !rest.contains('/'))
            })
            .map(|(name, value)| Parameter {
                name: name.clone(),
                value: value.clone(),
            })
            .collect())
    }
}

/// Object store keyed by bucket and key
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    buckets: HashSet<String>,
    objects: HashMap<(String, String), Vec<u8>>,
}

impl InMemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.buckets.insert(bucket.into());
        self
    }

    #[must_use]
    pub fn with_object(
        mut self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let bucket = bucket.into();
        self.buckets.insert(bucket.clone());
        self.objects.insert((bucket, key.into()), body.into());
        self
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str, _scope: &StoreScope) -> Result<Vec<u8>> {
        if !self.buckets.contains(bucket) {
            return Err(Error::not_found(format!("bucket '{bucket}'")));
        }
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("{bucket}/{key}")))
    }
}
