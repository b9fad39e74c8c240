use crate::{escape_bash_like, Formatter};
use envsnag_core::{EnvironmentMap, Result};

/// `KEY=VALUE` lines, suitable for `--env-file` style consumers and `set -a; . file`
pub struct EnvFileFormatter;

impl Formatter for EnvFileFormatter {
    fn name(&self) -> &'static str {
        "envfile"
    }

    fn render(&self, env: &EnvironmentMap) -> Result<String> {
        Ok(env
            .iter()
            .map(|(key, value)| format!("{key}={}\n", escape_bash_like(value)))
            .collect())
    }
}
