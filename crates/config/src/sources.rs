//! Discovery of the source list for a run

use crate::Settings;
use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s|,]+").expect("valid regex"));

/// Split a source list on runs of whitespace, commas and `|`
#[must_use]
pub fn split_source_list(list: &str) -> Vec<String> {
    SEPARATORS
        .split(list)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Positional arguments win; otherwise fall back to the configured list
#[must_use]
pub fn select_sources(args: &[String], settings: &Settings) -> Vec<String> {
    if !args.is_empty() {
        return args.to_vec();
    }
    match settings.source_list.as_deref() {
        Some(list) => {
            let sources = split_source_list(list);
            tracing::debug!(count = sources.len(), "using sources from environment");
            sources
        }
        None => Vec::new(),
    }
}
