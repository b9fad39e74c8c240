use envsnag_config::Settings;
use envsnag_core::{Error, RunResult, EXIT_INTERRUPTED};
use std::io::Write;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let settings = Settings::from_env();
    envsnag_utils::tracing::init(settings.log_aws_retries)
        .map_err(|e| eyre::eyre!("failed to initialize logging: {e}"))?;

    let result = tokio::select! {
        result = envsnag_cli::run(std::env::args(), &settings) => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::debug!("Received Ctrl-C, abandoning run");
            RunResult::failure(EXIT_INTERRUPTED, vec![Error::Interrupted.to_string()])
        }
    };

    // stderr before stdout
    let mut stderr = std::io::stderr().lock();
    for line in &result.stderr {
        writeln!(stderr, "{line}")?;
    }
    stderr.flush()?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(result.stdout.as_bytes())?;
    stdout.flush()?;

    std::process::exit(result.exit_code);
}
