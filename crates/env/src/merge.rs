//! Folding normalized sources into one mapping
//!
//! Sources are applied strictly in input order. A key set again keeps its
//! original position and takes the newer value.

use crate::normalize::normalize_entry;
use envsnag_core::{EnvVarName, EnvironmentMap, KeyNormalizationWarning, ResolvedEntry};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// How a key fared against the same key from other sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideMark {
    /// Also set elsewhere; this source's value is the one kept
    Winner,
    /// Also set elsewhere; a later source replaced this value
    Overridden,
}

impl fmt::Display for OverrideMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverrideMark::Winner => "+",
            OverrideMark::Overridden => "-",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    pub key: EnvVarName,
    pub mark: Option<OverrideMark>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Failed,
    /// Keys in the order this source first contributed them
    Merged(Vec<KeyReport>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: String,
    pub status: SourceStatus,
}

/// Per-source account of a finished merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub sources: Vec<SourceReport>,
}

#[derive(Debug)]
struct SourceRecord {
    source: String,
    keys: Option<IndexSet<EnvVarName>>,
}

/// Single owner of the environment while sources are applied
#[derive(Debug, Default)]
pub struct MergeEngine {
    env: EnvironmentMap,
    records: Vec<SourceRecord>,
    /// Index of the last source to set each key
    last_setter: HashMap<EnvVarName, usize>,
    /// Number of sources that set each key
    setters: HashMap<EnvVarName, usize>,
}

impl MergeEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and merge one source's entries.
    ///
    /// Entries whose keys cannot be normalized are skipped and returned as
    /// warnings; the rest of the source still merges.
    pub fn apply(
        &mut self,
        source: &str,
        entries: Vec<ResolvedEntry>,
    ) -> Vec<KeyNormalizationWarning> {
        let index = self.records.len();
        let mut keys = IndexSet::new();
        let mut warnings = Vec::new();

        for entry in entries {
            match normalize_entry(&entry) {
                Ok(name) => {
                    self.env.insert(name.clone(), entry.value);
                    keys.insert(name);
                }
                Err(warning) => warnings.push(warning),
            }
        }

        for key in &keys {
            *self.setters.entry(key.clone()).or_default() += 1;
            self.last_setter.insert(key.clone(), index);
        }
        debug!(source = %source, keys = keys.len(), dropped = warnings.len(), "Merged source");

        self.records.push(SourceRecord {
            source: source.to_string(),
            keys: Some(keys),
        });
        warnings
    }

    /// Note a source that contributed nothing because it failed
    pub fn record_failure(&mut self, source: &str) {
        self.records.push(SourceRecord {
            source: source.to_string(),
            keys: None,
        });
    }

    #[must_use]
    pub fn environment(&self) -> &EnvironmentMap {
        &self.env
    }

    /// Hand over the final mapping and the per-source report
    #[must_use]
    pub fn finish(self) -> (EnvironmentMap, MergeReport) {
        let sources = self
            .records
            .into_iter()
            .enumerate()
            .map(|(index, record)| SourceReport {
                source: record.source,
                status: match record.keys {
                    None => SourceStatus::Failed,
                    Some(keys) => SourceStatus::Merged(
                        keys.into_iter()
                            .map(|key| {
                                let shared = self.setters.get(&key).copied().unwrap_or(0) > 1;
                                let won = self.last_setter.get(&key) == Some(&index);
                                let mark = match (shared, won) {
                                    (false, _) => None,
                                    (true, true) => Some(OverrideMark::Winner),
                                    (true, false) => Some(OverrideMark::Overridden),
                                };
                                KeyReport { key, mark }
                            })
                            .collect(),
                    ),
                },
            })
            .collect();
        (self.env, MergeReport { sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(origin: &str, pairs: &[(&str, &str)]) -> Vec<ResolvedEntry> {
        pairs
            .iter()
            .map(|(k, v)| ResolvedEntry::new(*k, *v, origin))
            .collect()
    }

    fn pairs(env: &EnvironmentMap) -> Vec<(&str, &str)> {
        env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_later_source_wins_in_place() {
        let mut engine = MergeEngine::new();
        engine.apply("a", entries("a", &[("K", "1"), ("A_ONLY", "a")]));
        engine.apply("b", entries("b", &[("B_ONLY", "b"), ("k", "2")]));

        let (env, _) = engine.finish();
        assert_eq!(pairs(&env), vec![("K", "2"), ("A_ONLY", "a"), ("B_ONLY", "b")]);
    }

    #[test]
    fn test_bad_key_does_not_poison_source() {
        let mut engine = MergeEngine::new();
        let warnings = engine.apply(
            "s3://b/k.json",
            entries("s3://b/k.json", &[("good", "1"), ("will fail", "2"), ("also_good", "3")]),
        );

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, "will fail");
        assert_eq!(pairs(engine.environment()), vec![("GOOD", "1"), ("ALSO_GOOD", "3")]);
    }

    #[test]
    fn test_duplicate_within_source_keeps_last() {
        let mut engine = MergeEngine::new();
        let source = "sm://p/*";
        engine.apply(
            source,
            vec![
                ResolvedEntry::new("x", "from a-b", source).with_prefix("a-b"),
                ResolvedEntry::new("x", "from a_b", source).with_prefix("a_b"),
            ],
        );
        let (env, report) = engine.finish();
        assert_eq!(pairs(&env), vec![("A_B_X", "from a_b")]);
        assert_eq!(
            report.sources[0].status,
            SourceStatus::Merged(vec![KeyReport {
                key: EnvVarName::new("A_B_X").unwrap(),
                mark: None
            }])
        );
    }

    #[test]
    fn test_report_marks_overrides() {
        let mut engine = MergeEngine::new();
        engine.apply("first", entries("first", &[("SHARED", "1"), ("ONLY_FIRST", "x")]));
        engine.record_failure("broken");
        engine.apply("second", entries("second", &[("SHARED", "2")]));

        let (_, report) = engine.finish();
        let marks: Vec<(String, Option<Vec<(String, Option<OverrideMark>)>>)> = report
            .sources
            .into_iter()
            .map(|s| {
                let keys = match s.status {
                    SourceStatus::Failed => None,
                    SourceStatus::Merged(keys) => Some(
                        keys.into_iter()
                            .map(|k| (k.key.into_string(), k.mark))
                            .collect(),
                    ),
                };
                (s.source, keys)
            })
            .collect();

        assert_eq!(
            marks,
            vec![
                (
                    "first".to_string(),
                    Some(vec![
                        ("SHARED".to_string(), Some(OverrideMark::Overridden)),
                        ("ONLY_FIRST".to_string(), None),
                    ])
                ),
                ("broken".to_string(), None),
                (
                    "second".to_string(),
                    Some(vec![("SHARED".to_string(), Some(OverrideMark::Winner))])
                ),
            ]
        );
    }
}
