use crate::{escape_bash_like, Formatter};
use envsnag_core::{EnvironmentMap, Result};

/// `export KEY=VALUE` lines for `eval` in a POSIX shell
pub struct EnvFormatter;

impl Formatter for EnvFormatter {
    fn name(&self) -> &'static str {
        "env"
    }

    fn render(&self, env: &EnvironmentMap) -> Result<String> {
        Ok(env
            .iter()
            .map(|(key, value)| format!("export {key}={}\n", escape_bash_like(value)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envsnag_core::EnvVarName;

    fn env(pairs: &[(&str, &str)]) -> EnvironmentMap {
        pairs
            .iter()
            .map(|(k, v)| (EnvVarName::new(*k).unwrap(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_export() {
        let rendered = EnvFormatter
            .render(&env(&[("FOO", "bar"), ("SPACED", "bar baz"), ("QUOTE", "it's"), ("EMPTY", "")]))
            .unwrap();
        assert_eq!(
            rendered,
            "export FOO=bar\nexport SPACED='bar baz'\nexport QUOTE='it'\"'\"'s'\nexport EMPTY=''\n"
        );
    }

    #[test]
    fn test_env_empty_map() {
        assert_eq!(EnvFormatter.render(&EnvironmentMap::new()).unwrap(), "");
    }

    #[test]
    fn test_env_lines_parse_as_shell_words() {
        let value = "@^*309_!~`:*/\\{}%()>$t'";
        let rendered = EnvFormatter.render(&env(&[("TRICKY", value)])).unwrap();
        assert_eq!(
            shlex::split(&rendered),
            Some(vec!["export".to_string(), format!("TRICKY={value}")])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_env_output_evaluates_in_sh() {
        let value = "@^*309_!~`:*/\\{}%()>$t'";
        let rendered = EnvFormatter
            .render(&env(&[("TRICKY", value), ("PLAIN", "x")]))
            .unwrap();
        let output = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("{rendered}printf '%s|%s' \"$TRICKY\" \"$PLAIN\""))
            .output()
            .unwrap();
        assert_eq!(String::from_utf8(output.stdout).unwrap(), format!("{value}|x"));
    }
}
