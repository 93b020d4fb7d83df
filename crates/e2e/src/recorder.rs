//! Test outcome recording and suite aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pass/fail status of one executed test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Passed,
    Failed,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
        }
    }
}

/// Result of running a single test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub status: TestStatus,
    /// Elapsed wall-clock seconds
    pub duration: f64,
    /// Empty unless `status` is `Failed`
    #[serde(default)]
    pub error_message: String,
}

impl TestOutcome {
    pub fn passed(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration: duration.max(0.0),
            error_message: String::new(),
        }
    }

    pub fn failed(name: impl Into<String>, duration: f64, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration: duration.max(0.0),
            error_message: message.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// Ordered outcomes of one run plus derived counters.
///
/// Outcomes can only be appended, so `total == passed + failed == outcomes.len()`
/// holds at every point. Deserializing rebuilds the counters from the outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RecordedSuite")]
pub struct TestSuiteSummary {
    started_at: DateTime<Utc>,
    total: usize,
    passed: usize,
    failed: usize,
    results: Vec<TestOutcome>,
}

/// Wire form of a summary; stored counters are ignored
#[derive(Deserialize)]
struct RecordedSuite {
    #[serde(default = "Utc::now")]
    started_at: DateTime<Utc>,
    #[serde(default)]
    results: Vec<TestOutcome>,
}

impl From<RecordedSuite> for TestSuiteSummary {
    fn from(recorded: RecordedSuite) -> Self {
        let mut summary = Self {
            started_at: recorded.started_at,
            ..Self::new()
        };
        for outcome in recorded.results {
            summary.add_result(outcome);
        }
        summary
    }
}

impl Default for TestSuiteSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSuiteSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total: 0,
            passed: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    /// Append an outcome and update the counters
    pub fn add_result(&mut self, outcome: TestOutcome) {
        self.total += 1;
        match outcome.status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
        }
        self.results.push(outcome);
    }

    /// Percentage of passed outcomes, `0.0` for an empty suite
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.passed as f64 / self.total as f64 * 100.0
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Outcomes in execution order
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.results
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.results.iter().filter(|r| !r.is_passed())
    }

    /// Sum of per-case durations in seconds
    pub fn total_duration(&self) -> f64 {
        self.results.iter().map(|r| r.duration).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
