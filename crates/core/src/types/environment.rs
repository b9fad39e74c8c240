//! The ordered environment mapping produced by a run

use super::newtypes::EnvVarName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Ordered mapping of canonical keys to values.
///
/// Insertion order is the first time a key was seen. Re-inserting an existing
/// key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentMap(IndexMap<EnvVarName, String>);

impl EnvironmentMap {
    /// Create a new empty environment
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a variable, returning the previous value if any
    pub fn insert(&mut self, key: EnvVarName, value: impl Into<String>) -> Option<String> {
        self.0.insert(key, value.into())
    }

    /// Get a variable by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }

    /// Iterate keys in mapping order
    pub fn keys(&self) -> impl Iterator<Item = &EnvVarName> {
        self.0.keys()
    }
}

impl Deref for EnvironmentMap {
    type Target = IndexMap<EnvVarName, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<(EnvVarName, String)> for EnvironmentMap {
    fn from_iter<I: IntoIterator<Item = (EnvVarName, String)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (key, value) in iter {
            env.insert(key, value);
        }
        env
    }
}

impl<'a> IntoIterator for &'a EnvironmentMap {
    type Item = (&'a EnvVarName, &'a String);
    type IntoIter = indexmap::map::Iter<'a, EnvVarName, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
