//! The per-scheme resolution capability

use crate::backends::SecretStore;
use crate::registry::ResolverRegistry;
use async_trait::async_trait;
use envsnag_core::{Error, Result, ResolvedEntry, Scheme, SourceDescriptor, MAX_MANIFEST_DEPTH};
use std::sync::Arc;

/// Turns one source descriptor into an ordered list of raw entries
#[async_trait]
pub trait Resolver: Send + Sync {
    /// The scheme this resolver serves
    fn scheme(&self) -> Scheme;

    /// Resolve a descriptor
    ///
    /// # Returns
    /// * `Ok(entries)` - Entries in emission order; may be empty
    /// * `Err(error)` - The whole source failed
    async fn resolve(
        &self,
        descriptor: &SourceDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Result<Vec<ResolvedEntry>>;
}

/// What a resolver may reach beyond its own descriptor
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    registry: &'a ResolverRegistry,
    depth: usize,
}

impl<'a> ResolveContext<'a> {
    pub(crate) fn new(registry: &'a ResolverRegistry, depth: usize) -> Self {
        Self { registry, depth }
    }

    /// Manifest nesting level; top-level sources are at depth 0
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Resolve a descriptor referenced from inside another source
    pub async fn resolve_nested(&self, descriptor: &SourceDescriptor) -> Result<Vec<ResolvedEntry>> {
        let depth = self.depth + 1;
        if depth > MAX_MANIFEST_DEPTH {
            return Err(Error::resolution(
                descriptor.as_str(),
                Error::configuration(format!(
                    "nesting deeper than {MAX_MANIFEST_DEPTH} levels, possible reference cycle"
                )),
            ));
        }
        self.registry.dispatch(descriptor, depth).await
    }

    /// The raw secret store registered for a scheme
    pub fn secret_store(&self, scheme: Scheme) -> Result<Arc<dyn SecretStore>> {
        self.registry
            .secret_store(scheme)
            .ok_or_else(|| Error::unsupported_scheme(scheme.as_str()))
    }

    /// How many fetches to run at once out of `total`
    #[must_use]
    pub fn fetch_concurrency(&self, total: usize) -> usize {
        self.registry.fetch_concurrency(total)
    }
}
