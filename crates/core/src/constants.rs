/// Constants used throughout the envsnag codebase
// Source list fallback
pub const SOURCE_ENV_VAR: &str = "ENVSNAG_SOURCE";

// Logging
pub const LOG_ENV_VAR: &str = "ENVSNAG_LOG";
pub const LOG_AWS_RETRIES_VAR: &str = "ENVSNAG_LOG_AWS_RETRIES";
pub const DEFAULT_LOG_FILTER: &str = "warn";

// Backend tuning
pub const SM_CONCURRENCY_VAR: &str = "ENVSNAG_SM_CONCURRENCY";
pub const AWS_MAX_ATTEMPTS_VAR: &str = "ENVSNAG_AWS_MAX_ATTEMPTS";
pub const DEFAULT_AWS_MAX_ATTEMPTS: u32 = 10;

// Vault client
pub const VAULT_ADDR_VAR: &str = "VAULT_ADDR";
pub const VAULT_TOKEN_VAR: &str = "VAULT_TOKEN";
pub const VAULT_NAMESPACE_VAR: &str = "VAULT_NAMESPACE";

// Descriptor syntax
pub const SCHEME_SEPARATOR: &str = "://";
pub const WILDCARD_MARKER: &str = "/*";

// Manifests may reference other manifests; anything deeper is treated as a cycle
pub const MAX_MANIFEST_DEPTH: usize = 8;

// Output
pub const DEFAULT_FORMAT: &str = "env";

// Exit codes
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_FORMATTER_NOT_FOUND: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 130;
