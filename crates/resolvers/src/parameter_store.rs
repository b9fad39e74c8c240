//! Resolver for hierarchical parameters (`ssm://`)

use crate::backends::{ParameterStore, StoreScope};
use crate::resolver::{ResolveContext, Resolver};
use async_trait::async_trait;
use envsnag_core::{Result, ResolvedEntry, Scheme, SourceDescriptor};
use std::sync::Arc;

pub struct ParameterStoreResolver {
    store: Arc<dyn ParameterStore>,
}

impl ParameterStoreResolver {
    #[must_use]
    pub fn new(store: Arc<dyn ParameterStore>) -> Self {
        Self { store }
    }
}

/// Parameter paths are absolute and carry no trailing slash
fn parameter_path(locator: &str) -> String {
    format!("/{}", locator.trim_matches('/'))
}

#[async_trait]
impl Resolver for ParameterStoreResolver {
    fn scheme(&self) -> Scheme {
        Scheme::ParameterStore
    }

    async fn resolve(
        &self,
        descriptor: &SourceDescriptor,
        _ctx: &ResolveContext<'_>,
    ) -> Result<Vec<ResolvedEntry>> {
        let recursive = descriptor.is_wildcard();
        let path = parameter_path(descriptor.wildcard_prefix().unwrap_or(descriptor.locator()));
        let scope = StoreScope::from_descriptor(descriptor);

        let mut parameters = self
            .store
            .parameters_by_path(&path, recursive, &scope)
            .await?;
        parameters.sort_by(|a, b| a.name.cmp(&b.name));

        let base = path.trim_end_matches('/');
        Ok(parameters
            .into_iter()
            .map(|parameter| {
                let relative = parameter
                    .name
                    .strip_prefix(base)
                    .unwrap_or(&parameter.name)
                    .trim_start_matches('/');
                let relative = if recursive {
                    relative
                } else {
                    relative.rsplit_once('/').map_or(relative, |(_, leaf)| leaf)
                };
                ResolvedEntry::from_path(relative, parameter.value.as_str(), descriptor.as_str())
            })
            .collect())
    }
}
