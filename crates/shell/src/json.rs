use crate::Formatter;
use envsnag_core::{EnvironmentMap, Result};

/// One flat JSON object in mapping order, followed by a newline
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, env: &EnvironmentMap) -> Result<String> {
        let mut rendered = serde_json::to_string(env)?;
        rendered.push('\n');
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envsnag_core::EnvVarName;

    #[test]
    fn test_json_is_flat_and_ordered() {
        let env: EnvironmentMap = [
            (EnvVarName::new("ZED").unwrap(), "last \"quoted\"".to_string()),
            (EnvVarName::new("ALPHA").unwrap(), "1".to_string()),
        ]
        .into_iter()
        .collect();

        let rendered = JsonFormatter.render(&env).unwrap();
        assert_eq!(rendered, "{\"ZED\":\"last \\\"quoted\\\"\",\"ALPHA\":\"1\"}\n");

        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&rendered).unwrap();
        assert!(parsed.values().all(serde_json::Value::is_string));
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["ZED", "ALPHA"]);
    }

    #[test]
    fn test_json_empty() {
        assert_eq!(JsonFormatter.render(&EnvironmentMap::new()).unwrap(), "{}\n");
    }
}
