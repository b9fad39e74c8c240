//! Resolver for declarative YAML manifests (`manifest://path.yaml`)
//!
//! ```yaml
//! sources:
//!   - sm://app/shared
//! items:
//!   - name: prod/api/database
//!     env: DATABASE_URL
//!     store: sm
//! env:
//!   LOG_LEVEL: debug
//! ```
//!
//! Entries are emitted as nested sources, then items, then inline `env`.

use crate::backends::StoreScope;
use crate::resolver::{ResolveContext, Resolver};
use async_trait::async_trait;
use envsnag_core::{Error, Result, ResolvedEntry, Scheme, SourceDescriptor};
use envsnag_utils::try_join_ordered;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestDocument {
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    items: Vec<ManifestItem>,
    #[serde(default)]
    env: IndexMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestItem {
    name: String,
    env: String,
    #[serde(default)]
    store: ItemStore,
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ItemStore {
    #[default]
    Sm,
    Vault,
}

impl ItemStore {
    fn scheme(self) -> Scheme {
        match self {
            ItemStore::Sm => Scheme::SecretsManager,
            ItemStore::Vault => Scheme::Vault,
        }
    }
}

pub struct ManifestResolver {
    base_dir: PathBuf,
}

impl ManifestResolver {
    /// Relative manifest paths resolve against `base_dir`
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    async fn load(&self, path: &Path) -> Result<ManifestDocument> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::file_system(path, "read", e))?;
        if contents.trim().is_empty() {
            return Ok(ManifestDocument::default());
        }
        serde_yaml::from_str(&contents).map_err(|e| Error::manifest(path, e.to_string()))
    }
}

/// Resolve a local path against a base directory
pub(crate) fn local_path(base_dir: &Path, locator: &str) -> PathBuf {
    let path = Path::new(locator);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

#[async_trait]
impl Resolver for ManifestResolver {
    fn scheme(&self) -> Scheme {
        Scheme::Manifest
    }

    async fn resolve(
        &self,
        descriptor: &SourceDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Result<Vec<ResolvedEntry>> {
        let path = local_path(&self.base_dir, descriptor.locator());
        let document = self.load(&path).await?;
        let origin = descriptor.as_str();
        debug!(
            manifest = %path.display(),
            sources = document.sources.len(),
            items = document.items.len(),
            env = document.env.len(),
            "Loaded manifest"
        );

        let nested = document
            .sources
            .iter()
            .map(|s| SourceDescriptor::parse(s))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| Error::manifest(&path, e.to_string()))?;

        let mut entries = Vec::new();

        let count = nested.len();
        let resolved = try_join_ordered(nested, count, |nested: SourceDescriptor| {
            let path = &path;
            async move {
                ctx.resolve_nested(&nested).await.map_err(|e| {
                    // Failures inside an inner manifest already name it
                    let attributed = matches!(
                        &e,
                        Error::Resolution { cause, .. } if matches!(**cause, Error::Manifest { .. })
                    );
                    if attributed {
                        e
                    } else {
                        Error::manifest(path, format!("source '{nested}' failed: {e}"))
                    }
                })
            }
        })
        .await?;
        entries.extend(resolved.into_iter().flatten());

        let values = try_join_ordered(
            document.items.iter().cloned(),
            ctx.fetch_concurrency(document.items.len()),
            |item: ManifestItem| {
                let path = &path;
                async move {
                    let store = ctx.secret_store(item.store.scheme())?;
                    let scope = StoreScope::with_region(item.region.clone());
                    store.get_secret(&item.name, &scope).await.map_err(|e| {
                        Error::manifest(path, format!("item '{}' failed: {e}", item.name))
                    })
                }
            },
        )
        .await?;
        entries.extend(
            document
                .items
                .iter()
                .zip(values)
                .map(|(item, value)| ResolvedEntry::new(item.env.as_str(), value, origin)),
        );

        for (key, value) in &document.env {
            match scalar(value) {
                Some(value) => entries.push(ResolvedEntry::new(key.as_str(), value, origin)),
                None => warn!(
                    manifest = %path.display(),
                    key = %key,
                    "skipping inline value that is not a string, number or boolean"
                ),
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ResolverRegistry;
    use crate::testing::InMemorySecretStore;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn registry(dir: &TempDir) -> ResolverRegistry {
        let mut registry = ResolverRegistry::new();
        registry.register_secret_store(
            Scheme::SecretsManager,
            Arc::new(
                InMemorySecretStore::new()
                    .with_secret("app/shared", r#"{"SHARED":"s","LOG_LEVEL":"warn"}"#)
                    .with_secret("prod/api/database", "postgres://prod"),
            ),
        );
        registry.register_secret_store(
            Scheme::Vault,
            Arc::new(InMemorySecretStore::new().with_secret("secret/api/token", "vault-token")),
        );
        registry.register(Arc::new(ManifestResolver::new(dir.path())));
        registry
    }

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    async fn resolve(registry: &ResolverRegistry, source: &str) -> Result<Vec<ResolvedEntry>> {
        registry.resolve(&SourceDescriptor::parse(source).unwrap()).await
    }

    #[tokio::test]
    async fn test_emits_sources_then_items_then_env() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "deploy.yaml",
            r#"
sources:
  - sm://app/shared
items:
  - name: prod/api/database
    env: DATABASE_URL
  - name: secret/api/token
    env: API_TOKEN
    store: vault
env:
  LOG_LEVEL: debug
  PORT: 8080
  VERBOSE: true
  EMPTY: ~
"#,
        );
        let registry = registry(&dir);
        let entries = resolve(&registry, "manifest://deploy.yaml").await.unwrap();

        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("SHARED", "s"),
                ("LOG_LEVEL", "warn"),
                ("DATABASE_URL", "postgres://prod"),
                ("API_TOKEN", "vault-token"),
                ("LOG_LEVEL", "debug"),
                ("PORT", "8080"),
                ("VERBOSE", "1"),
            ]
        );
        assert_eq!(entries[0].origin, "sm://app/shared");
        assert_eq!(entries[2].origin, "manifest://deploy.yaml");
    }

    #[tokio::test]
    async fn test_absolute_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "abs.yaml", "env:\n  A: b\n");
        let mut registry = ResolverRegistry::new();
        registry.register(Arc::new(ManifestResolver::new("/nonexistent")));

        let source = format!("manifest://{}", dir.path().join("abs.yaml").display());
        let entries = resolve(&registry, &source).await.unwrap();
        assert_eq!(entries, vec![ResolvedEntry::new("A", "b", source.as_str())]);
    }

    #[tokio::test]
    async fn test_empty_manifest_is_empty() {
        let dir = TempDir::new().unwrap();
        write(&dir, "empty.yaml", "\n");
        let entries = resolve(&registry(&dir), "manifest://empty.yaml").await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_failures() {
        let dir = TempDir::new().unwrap();
        write(&dir, "bad_yaml.yaml", "sources: [unterminated");
        write(&dir, "bad_source.yaml", "sources:\n  - not-a-source\n");
        write(&dir, "missing_item.yaml", "items:\n  - name: nope\n    env: NOPE\n");
        write(&dir, "missing_nested.yaml", "sources:\n  - sm://nope\n");
        write(&dir, "unknown_field.yaml", "secrets: []\n");
        let registry = registry(&dir);

        for (name, needle) in [
            ("absent.yaml", "read"),
            ("bad_yaml.yaml", "bad_yaml.yaml"),
            ("bad_source.yaml", "missing scheme"),
            ("missing_item.yaml", "item 'nope' failed"),
            ("missing_nested.yaml", "source 'sm://nope' failed"),
            ("unknown_field.yaml", "unknown field"),
        ] {
            let source = format!("manifest://{name}");
            let err = resolve(&registry, &source).await.unwrap_err();
            assert!(matches!(err, Error::Resolution { .. }), "{name}");
            assert!(err.to_string().contains(needle), "{name}: {err}");
        }
    }

    #[tokio::test]
    async fn test_nested_manifests_and_cycles() {
        let dir = TempDir::new().unwrap();
        write(&dir, "outer.yaml", "sources:\n  - manifest://inner.yaml\nenv:\n  OUTER: o\n");
        write(&dir, "inner.yaml", "env:\n  INNER: i\n");
        write(&dir, "loop.yaml", "sources:\n  - manifest://loop.yaml\n");
        let registry = registry(&dir);

        let entries = resolve(&registry, "manifest://outer.yaml").await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["INNER", "OUTER"]);

        let err = resolve(&registry, "manifest://loop.yaml").await.unwrap_err();
        assert!(err.to_string().contains("nesting deeper than 8 levels"), "{err}");
    }
}
