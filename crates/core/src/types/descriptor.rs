//! Source descriptors: `<scheme>://<locator>[?<query>]`

use crate::constants::{SCHEME_SEPARATOR, WILDCARD_MARKER};
use crate::errors::{Error, Result};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Backend family a source is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scheme {
    /// AWS Secrets Manager (`sm://`)
    SecretsManager,
    /// HashiCorp Vault KV v2 (`vault://`)
    Vault,
    /// AWS SSM Parameter Store (`ssm://`)
    ParameterStore,
    /// AWS S3 JSON objects (`s3://`)
    ObjectStore,
    /// Local YAML manifest (`manifest://`)
    Manifest,
    /// Local dotenv file (`file://`)
    File,
}

impl Scheme {
    /// Every scheme, in registration order
    pub const ALL: [Scheme; 6] = [
        Scheme::SecretsManager,
        Scheme::Vault,
        Scheme::ParameterStore,
        Scheme::ObjectStore,
        Scheme::Manifest,
        Scheme::File,
    ];

    /// The scheme name as written in a descriptor
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Scheme::SecretsManager => "sm",
            Scheme::Vault => "vault",
            Scheme::ParameterStore => "ssm",
            Scheme::ObjectStore => "s3",
            Scheme::Manifest => "manifest",
            Scheme::File => "file",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::source_parse(s, "unrecognized scheme"))
    }
}

/// A parsed source reference. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    raw: String,
    scheme: Scheme,
    locator: String,
    query: IndexMap<String, String>,
    wildcard: bool,
}

impl SourceDescriptor {
    /// Parse a source string
    pub fn parse(input: &str) -> Result<Self> {
        let (scheme, rest) = input
            .split_once(SCHEME_SEPARATOR)
            .filter(|(scheme, _)| !scheme.is_empty())
            .ok_or_else(|| Error::source_parse(input, "missing scheme"))?;

        let scheme: Scheme = scheme
            .parse()
            .map_err(|_| Error::source_parse(input, format!("unrecognized scheme '{scheme}'")))?;

        let (locator, query_string) = match rest.split_once('?') {
            Some((locator, query)) => (locator, Some(query)),
            None => (rest, None),
        };

        if locator.is_empty() {
            return Err(Error::source_parse(input, "empty locator"));
        }

        let mut query = IndexMap::new();
        if let Some(query_string) = query_string {
            for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
                if query.contains_key(key.as_ref()) {
                    return Err(Error::source_parse(
                        input,
                        format!("duplicate query parameter '{key}'"),
                    ));
                }
                query.insert(key.into_owned(), value.into_owned());
            }
        }

        Ok(Self {
            raw: input.to_string(),
            scheme,
            locator: locator.to_string(),
            wildcard: locator.ends_with(WILDCARD_MARKER),
            query,
        })
    }

    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host and path exactly as written
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// The locator with the trailing `*` removed, keeping the `/`.
    ///
    /// Returns `None` for non-wildcard descriptors.
    #[must_use]
    pub fn wildcard_prefix(&self) -> Option<&str> {
        self.wildcard
            .then(|| &self.locator[..self.locator.len() - 1])
    }

    /// All query parameters in the order written
    #[must_use]
    pub fn query_params(&self) -> &IndexMap<String, String> {
        &self.query
    }

    /// A single query parameter
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// The `region` query parameter, if any
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.query("region").filter(|r| !r.is_empty())
    }

    /// A boolean query parameter. Absent means `false`.
    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.query(name) {
            None => Ok(false),
            Some(value) => parse_bool(value).ok_or_else(|| {
                Error::source_parse(
                    &self.raw,
                    format!("query parameter '{name}' must be a boolean, got '{value}'"),
                )
            }),
        }
    }

    /// The original source string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SourceDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
