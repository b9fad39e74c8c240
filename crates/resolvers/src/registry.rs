//! Scheme to resolver dispatch

use crate::backends::aws::{AwsClients, AwsObjectStore, AwsParameterStore, AwsSecretsManager};
use crate::backends::vault::VaultSecretStore;
use crate::backends::SecretStore;
use crate::env_file::EnvFileResolver;
use crate::manifest::ManifestResolver;
use crate::object_store::ObjectStoreResolver;
use crate::parameter_store::ParameterStoreResolver;
use crate::resolver::{ResolveContext, Resolver};
use crate::secret_store::SecretStoreResolver;
use envsnag_config::Settings;
use envsnag_core::{Error, Result, ResolvedEntry, Scheme, SourceDescriptor};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry of resolvers keyed by scheme
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<Scheme, Arc<dyn Resolver>>,
    secret_stores: HashMap<Scheme, Arc<dyn SecretStore>>,
    fetch_limit: Option<NonZeroUsize>,
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut schemes: Vec<_> = self.resolvers.keys().map(|s| s.as_str()).collect();
        schemes.sort_unstable();
        f.debug_struct("ResolverRegistry")
            .field("schemes", &schemes)
            .field("fetch_limit", &self.fetch_limit)
            .finish()
    }
}

impl ResolverRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry wired to the production AWS and Vault backends.
    ///
    /// Clients are created lazily, so building the registry never touches
    /// the network or requires credentials.
    #[must_use]
    pub fn with_defaults(settings: &Settings, base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let aws = Arc::new(AwsClients::new(settings.aws_max_attempts));

        let mut registry = Self::new().with_fetch_limit(settings.sm_concurrency);
        registry.register_secret_store(
            Scheme::SecretsManager,
            Arc::new(AwsSecretsManager::new(Arc::clone(&aws))),
        );
        registry.register_secret_store(
            Scheme::Vault,
            Arc::new(VaultSecretStore::new(settings.vault.clone())),
        );
        registry.register(Arc::new(ParameterStoreResolver::new(Arc::new(
            AwsParameterStore::new(Arc::clone(&aws)),
        ))));
        registry.register(Arc::new(ObjectStoreResolver::new(Arc::new(
            AwsObjectStore::new(aws),
        ))));
        registry.register(Arc::new(ManifestResolver::new(base_dir.clone())));
        registry.register(Arc::new(EnvFileResolver::new(base_dir)));
        registry
    }

    /// Bound the number of concurrent fetches inside one source
    #[must_use]
    pub fn with_fetch_limit(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// Register a resolver, replacing any previous one for its scheme
    pub fn register(&mut self, resolver: Arc<dyn Resolver>) {
        let scheme = resolver.scheme();
        info!(scheme = %scheme, "Registering resolver");
        self.resolvers.insert(scheme, resolver);
    }

    /// Register a raw secret store and the wildcard-aware resolver on top of it
    pub fn register_secret_store(&mut self, scheme: Scheme, store: Arc<dyn SecretStore>) {
        self.secret_stores.insert(scheme, Arc::clone(&store));
        self.register(Arc::new(SecretStoreResolver::new(scheme, store)));
    }

    #[must_use]
    pub fn resolver(&self, scheme: Scheme) -> Option<Arc<dyn Resolver>> {
        self.resolvers.get(&scheme).cloned()
    }

    #[must_use]
    pub fn secret_store(&self, scheme: Scheme) -> Option<Arc<dyn SecretStore>> {
        self.secret_stores.get(&scheme).cloned()
    }

    /// How many fetches to run at once out of `total`
    #[must_use]
    pub fn fetch_concurrency(&self, total: usize) -> usize {
        let total = total.max(1);
        self.fetch_limit.map_or(total, |limit| limit.get().min(total))
    }

    /// Resolve a top-level source.
    ///
    /// Every failure comes back as [`Error::Resolution`] naming the descriptor.
    pub async fn resolve(&self, descriptor: &SourceDescriptor) -> Result<Vec<ResolvedEntry>> {
        self.dispatch(descriptor, 0).await
    }

    pub(crate) async fn dispatch(
        &self,
        descriptor: &SourceDescriptor,
        depth: usize,
    ) -> Result<Vec<ResolvedEntry>> {
        let resolver = self.resolvers.get(&descriptor.scheme()).ok_or_else(|| {
            Error::resolution(
                descriptor.as_str(),
                Error::unsupported_scheme(descriptor.scheme().as_str()),
            )
        })?;

        debug!(source = %descriptor, depth, "Resolving source");
        let ctx = ResolveContext::new(self, depth);
        let entries = resolver
            .resolve(descriptor, &ctx)
            .await
            .map_err(|e| Error::resolution(descriptor.as_str(), e))?;
        debug!(source = %descriptor, entries = entries.len(), "Resolved source");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemorySecretStore;
    use async_trait::async_trait;

    struct StaticResolver;

    #[async_trait]
    impl Resolver for StaticResolver {
        fn scheme(&self) -> Scheme {
            Scheme::File
        }

        async fn resolve(
            &self,
            descriptor: &SourceDescriptor,
            _ctx: &ResolveContext<'_>,
        ) -> Result<Vec<ResolvedEntry>> {
            Ok(vec![ResolvedEntry::new("STATIC", "yes", descriptor.as_str())])
        }
    }

    #[tokio::test]
    async fn test_dispatches_by_scheme() {
        let mut registry = ResolverRegistry::new();
        registry.register(Arc::new(StaticResolver));

        let d = SourceDescriptor::parse("file://anything").unwrap();
        let entries = registry.resolve(&d).await.unwrap();
        assert_eq!(entries, vec![ResolvedEntry::new("STATIC", "yes", "file://anything")]);
    }

    #[tokio::test]
    async fn test_unregistered_scheme_is_resolution_error() {
        let registry = ResolverRegistry::new();
        let d = SourceDescriptor::parse("s3://bucket/key.json").unwrap();

        let err = registry.resolve(&d).await.unwrap_err();
        assert_eq!(err.descriptor(), Some("s3://bucket/key.json"));
        assert_eq!(err.to_string(), "no resolver registered for scheme 's3'");
    }

    #[tokio::test]
    async fn test_resolver_errors_are_wrapped() {
        let mut registry = ResolverRegistry::new();
        registry.register_secret_store(Scheme::SecretsManager, Arc::new(InMemorySecretStore::new()));

        let d = SourceDescriptor::parse("sm://missing").unwrap();
        let err = registry.resolve(&d).await.unwrap_err();
        assert!(matches!(err, Error::Resolution { .. }));
        assert_eq!(err.descriptor(), Some("sm://missing"));
        assert_eq!(err.to_string(), "'missing' not found");
    }

    #[test]
    fn test_fetch_concurrency_limit() {
        let registry = ResolverRegistry::new();
        assert_eq!(registry.fetch_concurrency(7), 7);

        let registry = ResolverRegistry::new().with_fetch_limit(NonZeroUsize::new(2));
        assert_eq!(registry.fetch_concurrency(7), 2);
        assert_eq!(registry.fetch_concurrency(0), 1);
    }

    #[test]
    fn test_defaults_register_every_scheme() {
        let registry = ResolverRegistry::with_defaults(&Settings::default(), ".");
        for scheme in Scheme::ALL {
            assert!(registry.resolver(scheme).is_some(), "{scheme}");
        }
        assert!(registry.secret_store(Scheme::SecretsManager).is_some());
        assert!(registry.secret_store(Scheme::Vault).is_some());
        assert!(registry.secret_store(Scheme::ParameterStore).is_none());
    }
}
