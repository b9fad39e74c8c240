//! Canonical key derivation

use envsnag_core::{EnvVarName, KeyNormalizationWarning, ResolvedEntry};

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Build the canonical name for a raw key and optional prefix.
///
/// Prefix segments are split on `/` with empty segments dropped; characters
/// outside `[A-Za-z0-9_]` become `_`. The key itself must already be a word.
pub fn canonical_key(key: &str, prefix: Option<&str>) -> Result<EnvVarName, String> {
    if key.is_empty() {
        return Err("key is empty".to_string());
    }
    if !key.chars().all(is_word_char) {
        return Err("contains characters outside [A-Za-z0-9_]".to_string());
    }

    let mut parts: Vec<String> = prefix
        .unwrap_or_default()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .chars()
                .map(|c| if is_word_char(c) { c } else { '_' })
                .collect()
        })
        .collect();
    parts.push(key.to_string());

    EnvVarName::new(parts.join("_").to_ascii_uppercase()).map_err(|e| e.to_string())
}

/// Normalize one entry, or explain why it was dropped
pub fn normalize_entry(entry: &ResolvedEntry) -> Result<EnvVarName, KeyNormalizationWarning> {
    canonical_key(&entry.key, entry.prefix.as_deref()).map_err(|reason| KeyNormalizationWarning {
        origin: entry.origin.clone(),
        key: entry.key.clone(),
        reason,
    })
}
