//! Command-line front end for envsnag
//!
//! [`run`] performs a whole invocation and returns a [`RunResult`] describing
//! what the process should print and how it should exit. The binary only
//! writes that result out, so every behaviour here is testable in-process
//! through [`run_with`] and the in-memory backends.

use clap::Parser;
use envsnag_config::{select_sources, Settings};
use envsnag_core::{
    Result, RunResult, SourceDescriptor, DEFAULT_FORMAT, EXIT_FAILURE, EXIT_FORMATTER_NOT_FOUND,
};
use envsnag_env::{render_summary, ErrorMode, Pipeline};
use envsnag_resolvers::ResolverRegistry;
use envsnag_shell::FormatterRegistry;
use std::path::PathBuf;
use tracing::debug;

/// Long flags that may also be spelled with a single dash
const GO_STYLE_FLAGS: &[&str] = &["output", "show-summary"];

#[derive(Debug, Parser)]
#[command(name = "envsnag")]
#[command(
    about = "Resolve secrets and configuration into environment variables",
    long_about = None
)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Sources to resolve, later sources override earlier ones.
    /// Falls back to ENVSNAG_SOURCE when empty.
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Output format (env, envfile, json)
    #[arg(short = 'o', long = "output", default_value = DEFAULT_FORMAT)]
    pub output: String,

    /// Abort on the first source that fails to resolve
    #[arg(short = 'e')]
    pub strict: bool,

    /// Print version information
    #[arg(short = 'v')]
    pub version: bool,

    /// Print a per-source summary to stderr
    #[arg(long = "show-summary")]
    pub show_summary: bool,
}

impl Cli {
    fn error_mode(&self) -> ErrorMode {
        if self.strict {
            ErrorMode::Strict
        } else {
            ErrorMode::Lenient
        }
    }
}

/// Rewrite single-dash long flags (`-output`, `-output=json`,
/// `-show-summary`) to their double-dash form. Arguments after `--` are left
/// alone.
pub fn normalize_go_flags<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut literal = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if literal {
                return arg;
            }
            if arg == "--" {
                literal = true;
                return arg;
            }
            match arg.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if GO_STYLE_FLAGS.contains(&name) {
                        format!("-{arg}")
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

#[must_use]
pub fn version_banner() -> String {
    format!(
        "envsnag version {} (aws sdk: {}, vault client: vaultrs {}, rust: {})",
        env!("CARGO_PKG_VERSION"),
        env!("ENVSNAG_AWS_SDK_VERSION"),
        env!("ENVSNAG_VAULTRS_VERSION"),
        env!("ENVSNAG_RUSTC_VERSION"),
    )
}

/// Run against the production backends, resolving relative paths from the
/// working directory.
pub async fn run<I, T>(args: I, settings: &Settings) -> RunResult
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let registry = ResolverRegistry::with_defaults(settings, base_dir);
    run_with(args, settings, &registry).await
}

/// Run a full invocation against the given resolvers.
///
/// `args` includes the program name, as with [`std::env::args`].
pub async fn run_with<I, T>(args: I, settings: &Settings, registry: &ResolverRegistry) -> RunResult
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let cli = match Cli::try_parse_from(normalize_go_flags(args)) {
        Ok(cli) => cli,
        Err(err) => {
            let rendered = err.render().to_string();
            return if err.use_stderr() {
                RunResult::failure(err.exit_code(), vec![rendered.trim_end().to_string()])
            } else {
                RunResult::success(rendered, Vec::new())
            };
        }
    };

    if cli.version {
        return RunResult::success(format!("{}\n", version_banner()), Vec::new());
    }

    let formatters = FormatterRegistry::new();
    let formatter = match formatters.get(&cli.output) {
        Ok(formatter) => formatter,
        Err(e) => return RunResult::failure(EXIT_FORMATTER_NOT_FOUND, vec![e.to_string()]),
    };

    let descriptors = match parse_sources(&select_sources(&cli.sources, settings)) {
        Ok(descriptors) => descriptors,
        Err(e) => {
            return RunResult::failure(EXIT_FAILURE, vec![format!("Error parsing sources: {e}")])
        }
    };
    debug!(sources = descriptors.len(), format = formatter.name(), "Starting run");

    let output = match Pipeline::new(registry, cli.error_mode())
        .run(&descriptors)
        .await
    {
        Ok(output) => output,
        Err(failure) => return RunResult::failure(EXIT_FAILURE, vec![failure.to_string()]),
    };

    let mut stderr = output.diagnostics;
    if cli.show_summary {
        stderr.extend(render_summary(&output.report));
    }

    match formatter.render(&output.env) {
        Ok(rendered) => RunResult::success(rendered, stderr),
        Err(e) => {
            stderr.push(e.to_string());
            RunResult::failure(EXIT_FAILURE, stderr)
        }
    }
}

fn parse_sources(sources: &[String]) -> Result<Vec<SourceDescriptor>> {
    sources.iter().map(|s| SourceDescriptor::parse(s)).collect()
}
