//! Settings read from the process environment

use envsnag_core::{
    AWS_MAX_ATTEMPTS_VAR, DEFAULT_AWS_MAX_ATTEMPTS, LOG_AWS_RETRIES_VAR, SM_CONCURRENCY_VAR,
    SOURCE_ENV_VAR, VAULT_ADDR_VAR, VAULT_NAMESPACE_VAR, VAULT_TOKEN_VAR,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::num::NonZeroUsize;

static TRUTHY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(1|true|yes)$").expect("valid regex"));

/// Whether an environment value counts as "on"
#[must_use]
pub fn env_bool(value: &str) -> bool {
    TRUTHY.is_match(value.trim())
}

/// Connection settings for HashiCorp Vault
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultSettings {
    pub address: Option<String>,
    pub token: Option<String>,
    pub namespace: Option<String>,
}

/// Immutable runtime settings shared by every component of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Raw source list used when no positional sources are given
    pub source_list: Option<String>,

    /// Upper bound on concurrent secret fetches within one source.
    /// `None` fetches everything at once.
    pub sm_concurrency: Option<NonZeroUsize>,

    /// Emit SDK retry attempts to the log
    pub log_aws_retries: bool,

    /// Attempts per AWS request, including the first
    pub aws_max_attempts: u32,

    pub vault: VaultSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_list: None,
            sm_concurrency: None,
            log_aws_retries: false,
            aws_max_attempts: DEFAULT_AWS_MAX_ATTEMPTS,
            vault: VaultSettings::default(),
        }
    }
}

impl Settings {
    /// Read settings from the real process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup function.
    ///
    /// Empty values are treated as unset. Values that do not parse are
    /// ignored with a warning and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let sm_concurrency = get(SM_CONCURRENCY_VAR).and_then(|raw| {
            match raw.trim().parse::<NonZeroUsize>() {
                Ok(n) => Some(n),
                Err(_) => {
                    tracing::warn!(
                        variable = SM_CONCURRENCY_VAR,
                        value = %raw,
                        "ignoring invalid concurrency limit"
                    );
                    None
                }
            }
        });

        let aws_max_attempts = get(AWS_MAX_ATTEMPTS_VAR)
            .and_then(|raw| match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    tracing::warn!(
                        variable = AWS_MAX_ATTEMPTS_VAR,
                        value = %raw,
                        "ignoring invalid attempt count"
                    );
                    None
                }
            })
            .unwrap_or(DEFAULT_AWS_MAX_ATTEMPTS);

        Self {
            source_list: get(SOURCE_ENV_VAR),
            sm_concurrency,
            log_aws_retries: get(LOG_AWS_RETRIES_VAR).is_some_and(|v| env_bool(&v)),
            aws_max_attempts,
            vault: VaultSettings {
                address: get(VAULT_ADDR_VAR),
                token: get(VAULT_TOKEN_VAR),
                namespace: get(VAULT_NAMESPACE_VAR),
            },
        }
    }
}
