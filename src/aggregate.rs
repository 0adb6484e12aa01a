//! Aggregation of a results document into a [`MetricsSnapshot`]

use crate::report::{ResultStatus, ResultsDocument, TestResult};

/// Counts and total duration for one test run
///
/// `total` always equals `passed + failed + skipped + other`. Tests whose
/// first attempt has no recognised status land in `other`, which is not
/// exported as its own gauge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub other: u64,
    /// Sum of first-attempt durations in milliseconds
    pub duration_ms: f64,
}

impl MetricsSnapshot {
    /// Account for one test given its first attempt (if any)
    ///
    /// Retries are deliberately not considered: a test that failed and then
    /// passed on retry counts as failed.
    pub fn record(&mut self, first: Option<&TestResult>) {
        self.total += 1;

        let status = first.map(|r| r.status).unwrap_or_default();
        match status {
            ResultStatus::Passed => self.passed += 1,
            ResultStatus::Failed => self.failed += 1,
            ResultStatus::Skipped => self.skipped += 1,
            ResultStatus::Other => self.other += 1,
        }

        self.duration_ms += first.and_then(|r| r.duration).unwrap_or(0.0);
    }

    /// Duration rounded to whole milliseconds, as exported
    pub fn duration_millis(&self) -> i64 {
        self.duration_ms.round() as i64
    }

    pub fn is_consistent(&self) -> bool {
        self.total == self.passed + self.failed + self.skipped + self.other
    }
}

/// Walk suites, specs and tests in document order and tally them
pub fn aggregate(document: &ResultsDocument) -> MetricsSnapshot {
    let mut snapshot = MetricsSnapshot::default();

    for suite in &document.suites {
        for spec in &suite.specs {
            for test in &spec.tests {
                snapshot.record(test.first_result());
            }
        }
    }

    tracing::debug!(
        total = snapshot.total,
        passed = snapshot.passed,
        failed = snapshot.failed,
        skipped = snapshot.skipped,
        other = snapshot.other,
        duration_ms = snapshot.duration_ms,
        "Aggregated test results"
    );

    snapshot
}
