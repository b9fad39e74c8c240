//! Output format lookup

use crate::{EnvFileFormatter, EnvFormatter, JsonFormatter};
use envsnag_core::{EnvironmentMap, Error, Result};
use indexmap::IndexMap;

/// Renders a finished environment as text
pub trait Formatter: Send + Sync {
    /// Name used to select this format on the command line
    fn name(&self) -> &'static str;

    fn render(&self, env: &EnvironmentMap) -> Result<String>;
}

/// Formatters keyed by name
pub struct FormatterRegistry {
    formatters: IndexMap<&'static str, Box<dyn Formatter>>,
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.formatters.keys()).finish()
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(EnvFormatter));
        registry.register(Box::new(EnvFileFormatter));
        registry.register(Box::new(JsonFormatter));
        registry
    }
}

impl FormatterRegistry {
    /// The built-in formats: `env`, `envfile`, `json`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            formatters: IndexMap::new(),
        }
    }

    pub fn register(&mut self, formatter: Box<dyn Formatter>) {
        self.formatters.insert(formatter.name(), formatter);
    }

    /// Look up a formatter by name
    pub fn get(&self, name: &str) -> Result<&dyn Formatter> {
        self.formatters
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| Error::formatter_not_found(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formatters.keys().copied()
    }
}
