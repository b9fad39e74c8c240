//! Resolver for named-secret stores (`sm://`, `vault://`)

use crate::backends::{SecretStore, StoreScope};
use crate::decode::decode_object;
use crate::resolver::{ResolveContext, Resolver};
use async_trait::async_trait;
use envsnag_core::{Result, ResolvedEntry, Scheme, SourceDescriptor};
use envsnag_utils::try_join_ordered;
use std::sync::Arc;
use tracing::debug;

/// Resolves single secrets as JSON objects and wildcards as one entry per secret
pub struct SecretStoreResolver {
    scheme: Scheme,
    store: Arc<dyn SecretStore>,
}

impl SecretStoreResolver {
    #[must_use]
    pub fn new(scheme: Scheme, store: Arc<dyn SecretStore>) -> Self {
        Self { scheme, store }
    }

    /// Stage one: every secret name strictly under `prefix`, sorted and unique
    async fn enumerate(&self, prefix: &str, scope: &StoreScope) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .store
            .list_secrets(prefix, scope)
            .await?
            .into_iter()
            .filter(|name| name.len() > prefix.len() && name.starts_with(prefix))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn resolve_wildcard(
        &self,
        descriptor: &SourceDescriptor,
        prefix: &str,
        ctx: &ResolveContext<'_>,
    ) -> Result<Vec<ResolvedEntry>> {
        let scope = StoreScope::from_descriptor(descriptor);
        let flatten = descriptor.flag("flatten")?;
        let origin = descriptor.as_str();

        let names = self.enumerate(prefix, &scope).await?;
        debug!(source = %descriptor, count = names.len(), "Enumerated secrets");

        // Stage two: fetch in sorted order with bounded concurrency
        let concurrency = ctx.fetch_concurrency(names.len());
        let bodies = try_join_ordered(names.iter().cloned(), concurrency, |name: String| {
            let scope = &scope;
            async move { self.store.get_secret(&name, scope).await }
        })
        .await?;

        let mut entries = Vec::with_capacity(bodies.len());
        for (name, body) in names.iter().zip(bodies) {
            let relative = &name[prefix.len()..];
            if flatten {
                entries.extend(decode_object(&body, name, origin, Some(relative))?);
            } else {
                entries.push(ResolvedEntry::from_path(relative, body, origin));
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl Resolver for SecretStoreResolver {
    fn scheme(&self) -> Scheme {
        self.scheme
    }

    async fn resolve(
        &self,
        descriptor: &SourceDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Result<Vec<ResolvedEntry>> {
        if let Some(prefix) = descriptor.wildcard_prefix() {
            // Vault names are listed as `<mount>/<path>` without a leading slash
            let prefix = match self.scheme {
                Scheme::Vault => prefix.trim_start_matches('/'),
                _ => prefix,
            };
            return self.resolve_wildcard(descriptor, prefix, ctx).await;
        }

        let scope = StoreScope::from_descriptor(descriptor);
        let name = descriptor.locator();
        let body = self.store.get_secret(name, &scope).await?;
        decode_object(&body, name, descriptor.as_str(), None)
    }
}
