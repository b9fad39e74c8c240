//! Raw key/value pairs produced by resolvers

/// One key/value pair emitted by a resolver, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Key exactly as the backend reported it
    pub key: String,
    pub value: String,
    /// Display string of the owning source descriptor
    pub origin: String,
    /// Path segments ahead of the key for wildcard and recursive results
    pub prefix: Option<String>,
}

impl ResolvedEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            origin: origin.into(),
            prefix: None,
        }
    }

    /// Entry named by a backend path such as `recursive/charles-dickens`.
    ///
    /// The last segment becomes the key and the rest the prefix. Characters
    /// outside `[A-Za-z0-9_]` in the key are replaced with `_`, the same as
    /// prefix segments.
    pub fn from_path(path: &str, value: impl Into<String>, origin: impl Into<String>) -> Self {
        let (parent, leaf) = path.rsplit_once('/').unwrap_or(("", path));
        let key: String = leaf
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        Self::new(key, value, origin).with_prefix(parent)
    }

    /// Attach a derived prefix. Empty prefixes are stored as `None`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    /// Re-home the entry under another origin
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}
