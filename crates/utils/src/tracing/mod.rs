use envsnag_core::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use ::tracing::{debug, error, info, instrument, trace, warn, Level, Span};

/// Directive that surfaces SDK retry attempts
pub const AWS_RETRY_DIRECTIVE: &str = "aws_smithy_runtime=debug";

/// Initialize the tracing system
///
/// All log output goes to stderr so stdout only ever carries rendered
/// output. ANSI colours are used only when stderr is a terminal.
pub fn init(log_aws_retries: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let directives = filter_directives(
        std::env::var(LOG_ENV_VAR).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        log_aws_retries,
    );
    let filter = EnvFilter::try_new(&directives)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Build the filter string: the tool's own variable first, then `RUST_LOG`,
/// then the default.
#[must_use]
pub fn filter_directives(
    envsnag_log: Option<String>,
    rust_log: Option<String>,
    log_aws_retries: bool,
) -> String {
    let base = envsnag_log
        .or(rust_log)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    if log_aws_retries {
        format!("{base},{AWS_RETRY_DIRECTIVE}")
    } else {
        base
    }
}

/// Check if stderr is attached to a terminal
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(filter_directives(None, None, false), "warn");
    }

    #[test]
    fn test_own_variable_wins_over_rust_log() {
        assert_eq!(
            filter_directives(Some("debug".into()), Some("trace".into()), false),
            "debug"
        );
        assert_eq!(filter_directives(None, Some("info".into()), false), "info");
    }

    #[test]
    fn test_aws_retries_directive_appended() {
        assert_eq!(
            filter_directives(None, None, true),
            "warn,aws_smithy_runtime=debug"
        );
    }

    #[test]
    fn test_directives_parse() {
        let directives = filter_directives(Some("envsnag=debug".into()), None, true);
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
