//! Resolver for local dotenv files (`file://path/.env`)
//!
//! Lines are `KEY=VALUE`. Values are taken literally: no variable
//! expansion or escape sequences, only one pair of matching surrounding
//! quotes is stripped. Values written as a secret reference (`sm://name`,
//! `vault://mount/path`) are replaced by the raw body of that secret.

use crate::backends::StoreScope;
use crate::manifest::local_path;
use crate::resolver::{ResolveContext, Resolver};
use async_trait::async_trait;
use envsnag_core::{Error, Result, ResolvedEntry, Scheme, SourceDescriptor};
use envsnag_utils::try_join_ordered;
use std::path::PathBuf;
use tracing::debug;

pub struct EnvFileResolver {
    base_dir: PathBuf,
}

impl EnvFileResolver {
    /// Relative file paths resolve against `base_dir`
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

/// Parse dotenv text into pairs in file order.
///
/// Blank lines, `#` comments, lines without `=` and lines with an empty key
/// are skipped.
fn parse_env_file(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), unquote(value.trim())))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// A value that names a single secret to fetch in its place
fn secret_reference(value: &str) -> Option<SourceDescriptor> {
    let descriptor = SourceDescriptor::parse(value).ok()?;
    let is_secret = matches!(descriptor.scheme(), Scheme::SecretsManager | Scheme::Vault);
    (is_secret && !descriptor.is_wildcard()).then_some(descriptor)
}

#[async_trait]
impl Resolver for EnvFileResolver {
    fn scheme(&self) -> Scheme {
        Scheme::File
    }

    async fn resolve(
        &self,
        descriptor: &SourceDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Result<Vec<ResolvedEntry>> {
        let path = local_path(&self.base_dir, descriptor.locator());
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::file_system(&path, "read", e))?;

        let pairs = parse_env_file(&contents);
        debug!(file = %path.display(), count = pairs.len(), "Parsed env file");

        let concurrency = ctx.fetch_concurrency(pairs.len());
        let values = try_join_ordered(
            pairs.iter().cloned(),
            concurrency,
            |(key, value): (String, String)| async move {
                let Some(reference) = secret_reference(&value) else {
                    return Ok(value);
                };
                let store = ctx.secret_store(reference.scheme())?;
                let scope = StoreScope::from_descriptor(&reference);
                store
                    .get_secret(reference.locator(), &scope)
                    .await
                    .map_err(|e| Error::decode(key.as_str(), format!("{reference}: {e}")))
            },
        )
        .await?;

        Ok(pairs
            .iter()
            .zip(values)
            .map(|((key, _), value)| ResolvedEntry::new(key.as_str(), value, descriptor.as_str()))
            .collect())
    }
}
