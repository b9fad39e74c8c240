//! Resolve every source concurrently, then merge in source order

use crate::merge::{MergeEngine, MergeReport};
use envsnag_core::{EnvironmentMap, Error, SourceDescriptor};
use envsnag_resolvers::ResolverRegistry;
use futures::stream::{FuturesOrdered, StreamExt};
use std::fmt;
use tracing::{debug, warn};

/// What a failed source means for the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Report the failure and carry on without that source
    #[default]
    Lenient,
    /// The first failure, in source order, ends the run
    Strict,
}

/// The diagnostic line for a failed source
#[must_use]
pub fn source_error_line(source: &str, error: &Error) -> String {
    format!("Error processing source: {source}: {error}")
}

/// A completed run
#[derive(Debug)]
pub struct PipelineOutput {
    pub env: EnvironmentMap,
    pub report: MergeReport,
    /// Lines for stderr: lenient failures and dropped keys, in source order
    pub diagnostics: Vec<String>,
}

/// A run stopped by a failed source in strict mode
#[derive(Debug)]
pub struct PipelineFailure {
    pub source: String,
    pub error: Error,
}

impl fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&source_error_line(&self.source, &self.error))
    }
}

impl std::error::Error for PipelineFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Drives resolution and merging for a list of sources
#[derive(Debug)]
pub struct Pipeline<'a> {
    registry: &'a ResolverRegistry,
    mode: ErrorMode,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(registry: &'a ResolverRegistry, mode: ErrorMode) -> Self {
        Self { registry, mode }
    }

    /// Resolve all sources at once and merge the results in input order.
    ///
    /// Nothing is merged until every source has finished. In strict mode the
    /// first failure drops the remaining resolutions.
    pub async fn run(
        &self,
        descriptors: &[SourceDescriptor],
    ) -> Result<PipelineOutput, PipelineFailure> {
        let mut pending: FuturesOrdered<_> = descriptors
            .iter()
            .map(|descriptor| async move { (descriptor, self.registry.resolve(descriptor).await) })
            .collect();

        let mut results = Vec::with_capacity(descriptors.len());
        while let Some((descriptor, result)) = pending.next().await {
            match result {
                Err(error) if self.mode == ErrorMode::Strict => {
                    debug!(source = %descriptor, "Aborting on first failed source");
                    return Err(PipelineFailure {
                        source: descriptor.to_string(),
                        error,
                    });
                }
                result => results.push((descriptor, result)),
            }
        }

        let mut engine = MergeEngine::new();
        let mut diagnostics = Vec::new();
        for (descriptor, result) in results {
            let source = descriptor.as_str();
            match result {
                Ok(entries) => {
                    for warning in engine.apply(source, entries) {
                        warn!(source = %source, key = %warning.key, "Dropping key");
                        diagnostics.push(warning.to_string());
                    }
                }
                Err(error) => {
                    warn!(source = %source, error = %error, "Skipping failed source");
                    diagnostics.push(source_error_line(source, &error));
                    engine.record_failure(source);
                }
            }
        }

        let (env, report) = engine.finish();
        Ok(PipelineOutput {
            env,
            report,
            diagnostics,
        })
    }
}
