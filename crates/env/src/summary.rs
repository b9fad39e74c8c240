//! Per-source summary lines for stderr

use crate::merge::{MergeReport, SourceStatus};

pub const SUMMARY_HEADER: &str = "envsnag summary:";

/// Render the summary header followed by one line per source
#[must_use]
pub fn render_summary(report: &MergeReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.sources.len() + 1);
    lines.push(SUMMARY_HEADER.to_string());
    for source in &report.sources {
        lines.push(match &source.status {
            SourceStatus::Failed => format!("\t{}: failed", source.source),
            SourceStatus::Merged(keys) => {
                let listed: Vec<String> = keys
                    .iter()
                    .map(|k| match k.mark {
                        Some(mark) => format!("{mark}{}", k.key),
                        None => k.key.to_string(),
                    })
                    .collect();
                format!(
                    "\t{}: {} keys ({})",
                    source.source,
                    keys.len(),
                    listed.join(", ")
                )
            }
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergeEngine;
    use envsnag_core::ResolvedEntry;

    #[test]
    fn test_summary_lines() {
        let mut engine = MergeEngine::new();
        engine.apply(
            "sm://base",
            vec![
                ResolvedEntry::new("HOST", "a", "sm://base"),
                ResolvedEntry::new("PORT", "1", "sm://base"),
            ],
        );
        engine.record_failure("s3://missing/config.json");
        engine.apply(
            "sm://override",
            vec![ResolvedEntry::new("PORT", "2", "sm://override")],
        );
        engine.apply("sm://empty", Vec::new());
        let (_, report) = engine.finish();

        assert_eq!(
            render_summary(&report),
            vec![
                "envsnag summary:",
                "\tsm://base: 2 keys (HOST, -PORT)",
                "\ts3://missing/config.json: failed",
                "\tsm://override: 1 keys (+PORT)",
                "\tsm://empty: 0 keys ()",
            ]
        );
    }
}
