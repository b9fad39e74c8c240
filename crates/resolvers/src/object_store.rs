//! Resolver for JSON objects in an object store (`s3://bucket/key`)

use crate::backends::{ObjectStore, StoreScope};
use crate::decode::decode_object;
use crate::resolver::{ResolveContext, Resolver};
use async_trait::async_trait;
use envsnag_core::{Error, Result, ResolvedEntry, Scheme, SourceDescriptor};
use std::sync::Arc;
use tracing::debug;

pub struct ObjectStoreResolver {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreResolver {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

fn split_locator(locator: &str) -> Result<(&str, &str)> {
    match locator.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok((bucket, key)),
        _ => Err(Error::configuration(format!(
            "object locator '{locator}' must be <bucket>/<key>"
        ))),
    }
}

#[async_trait]
impl Resolver for ObjectStoreResolver {
    fn scheme(&self) -> Scheme {
        Scheme::ObjectStore
    }

    async fn resolve(
        &self,
        descriptor: &SourceDescriptor,
        _ctx: &ResolveContext<'_>,
    ) -> Result<Vec<ResolvedEntry>> {
        if descriptor.is_wildcard() {
            return Err(Error::configuration(
                "wildcards are not supported for object sources",
            ));
        }

        let (bucket, key) = split_locator(descriptor.locator())?;
        let scope = StoreScope::with_region(descriptor.region().map(str::to_string));
        let bytes = self.store.get_object(bucket, key, &scope).await?;
        debug!(bucket = %bucket, key = %key, bytes = bytes.len(), "Fetched object");

        let body = String::from_utf8(bytes)
            .map_err(|_| Error::decode(descriptor.locator(), "object body is not valid UTF-8"))?;
        decode_object(&body, descriptor.locator(), descriptor.as_str(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ResolverRegistry;
    use crate::testing::InMemoryObjectStore;

    fn registry() -> ResolverRegistry {
        let store = InMemoryObjectStore::new()
            .with_object("config", "app.json", r#"{"b":"2","a":"1","flag":true}"#)
            .with_object("config", "broken.json", "{not json")
            .with_bucket("empty");
        let mut registry = ResolverRegistry::new();
        registry.register(Arc::new(ObjectStoreResolver::new(Arc::new(store))));
        registry
    }

    async fn resolve(source: &str) -> Result<Vec<ResolvedEntry>> {
        registry()
            .resolve(&SourceDescriptor::parse(source).unwrap())
            .await
    }

    #[test]
    fn test_split_locator() {
        assert_eq!(split_locator("b/dir/k.json").unwrap(), ("b", "dir/k.json"));
        assert!(split_locator("bucket").is_err());
        assert!(split_locator("bucket/").is_err());
        assert!(split_locator("/key").is_err());
    }

    #[tokio::test]
    async fn test_object_decodes_in_document_order() {
        let entries = resolve("s3://config/app.json?region=eu-west-1").await.unwrap();
        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_str()))
            .collect();
        assert_eq!(pairs, vec![("b", "2"), ("a", "1"), ("flag", "1")]);
    }

    #[tokio::test]
    async fn test_failures_are_resolution_errors() {
        for source in [
            "s3://config/missing.json",
            "s3://nobucket/app.json",
            "s3://empty/app.json",
            "s3://config/broken.json",
            "s3://config/*",
            "s3://config",
        ] {
            let err = resolve(source).await.unwrap_err();
            assert_eq!(err.descriptor(), Some(source), "{source}");
        }
    }
}
