//! Console summary and JSON results file

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::E2eResult;
use crate::recorder::{TestOutcome, TestSuiteSummary};

const RULE_WIDTH: usize = 70;

/// Serialized form of a finished run
#[derive(Debug, Serialize)]
pub struct ResultsFile<'a> {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub total_duration: f64,
    pub results: &'a [TestOutcome],
}

impl<'a> From<&'a TestSuiteSummary> for ResultsFile<'a> {
    fn from(summary: &'a TestSuiteSummary) -> Self {
        Self {
            started_at: summary.started_at(),
            total: summary.total(),
            passed: summary.passed(),
            failed: summary.failed(),
            success_rate: summary.success_rate(),
            total_duration: summary.total_duration(),
            results: summary.outcomes(),
        }
    }
}

/// Header printed before a run
pub fn render_header(target_url: &str, started_at: DateTime<Utc>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{:^width$}", "AUTOMATED LOGIN TESTING", width = RULE_WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Test URL: {}", target_url);
    let _ = writeln!(out, "Started at: {}", started_at.format("%Y-%m-%d %H:%M:%S"));
    out
}

/// Human-readable summary of a run
pub fn render_summary(summary: &TestSuiteSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{:^width$}", "TEST RESULTS SUMMARY", width = RULE_WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total Tests:    {}", summary.total());
    let _ = writeln!(out, "Passed:         {} ✓", summary.passed());
    let _ = writeln!(out, "Failed:         {} ✗", summary.failed());
    let _ = writeln!(out, "Success Rate:   {:.2}%", summary.success_rate());
    let _ = writeln!(out, "Total Duration: {:.3}s", summary.total_duration());
    let _ = writeln!(out, "{rule}");

    if !summary.all_passed() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failed Tests:");
        for outcome in summary.failures() {
            let _ = writeln!(out, "  ✗ {}", outcome.name);
            let _ = writeln!(out, "    {}", outcome.error_message);
        }
    }

    out
}

/// Write results to `test-results.json` in `output_dir`
pub fn write_results(summary: &TestSuiteSummary, output_dir: &Path) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("test-results.json");
    let json = serde_json::to_string_pretty(&ResultsFile::from(summary))?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TestSuiteSummary {
        let mut summary = TestSuiteSummary::new();
        summary.add_result(TestOutcome::passed("Valid Login Credentials", 1.25));
        summary.add_result(TestOutcome::failed(
            "Invalid Username",
            0.5,
            "Assertion failed: Error message doesn't mention username",
        ));
        summary
    }

    #[test]
    fn test_summary_lists_counts_and_failures() {
        let text = render_summary(&sample());
        assert!(text.contains("Total Tests:    2"));
        assert!(text.contains("Passed:         1 ✓"));
        assert!(text.contains("Failed:         1 ✗"));
        assert!(text.contains("Success Rate:   50.00%"));
        assert!(text.contains("Total Duration: 1.750s"));
        assert!(text.contains("  ✗ Invalid Username"));
        assert!(text.contains("doesn't mention username"));
        assert!(!text.contains("✗ Valid Login Credentials"));
    }

    #[test]
    fn test_summary_without_failures_has_no_failed_section() {
        let mut summary = TestSuiteSummary::new();
        summary.add_result(TestOutcome::passed("only", 0.1));
        let text = render_summary(&summary);
        assert!(text.contains("Success Rate:   100.00%"));
        assert!(!text.contains("Failed Tests:"));
    }

    #[test]
    fn test_empty_summary() {
        let text = render_summary(&TestSuiteSummary::new());
        assert!(text.contains("Total Tests:    0"));
        assert!(text.contains("Success Rate:   0.00%"));
    }

    #[test]
    fn test_header() {
        let started = DateTime::parse_from_rfc3339("2025-10-30T09:15:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let text = render_header("https://example.test/login", started);
        assert!(text.contains("AUTOMATED LOGIN TESTING"));
        assert!(text.contains("Test URL: https://example.test/login"));
        assert!(text.contains("Started at: 2025-10-30 09:15:00"));
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        let path = write_results(&sample(), &out).unwrap();
        assert_eq!(path, out.join("test-results.json"));

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["success_rate"], 50.0);
        assert_eq!(value["results"][1]["status"], "FAILED");
        assert_eq!(value["results"][0]["error_message"], "");
    }
}
