//! Prometheus text exposition for a [`MetricsSnapshot`]
//!
//! Downstream dashboards scrape these exact names, so the five gauges and
//! their order are fixed. Each sample is preceded by its `# TYPE` and then
//! its `# HELP` line.
//!
//! ```text
//! # TYPE playwright_test_total gauge
//! # HELP playwright_test_total Total number of Playwright tests.
//! playwright_test_total 2
//! ...
//! ```

use prometheus::core::Collector;
use prometheus::{IntGauge, Opts};

use crate::aggregate::MetricsSnapshot;
use crate::error::AppResult;

pub const TOTAL: &str = "playwright_test_total";
pub const PASSED: &str = "playwright_test_passed";
pub const FAILED: &str = "playwright_test_failed";
pub const SKIPPED: &str = "playwright_test_skipped";
pub const DURATION: &str = "playwright_test_duration_milliseconds";

type Accessor = fn(&MetricsSnapshot) -> i64;

/// Gauge name, help text and value accessor in export order
const GAUGES: [(&str, &str, Accessor); 5] = [
    (
        TOTAL,
        "Total number of Playwright tests.",
        |s| s.total as i64,
    ),
    (
        PASSED,
        "Number of Playwright tests that passed.",
        |s| s.passed as i64,
    ),
    (
        FAILED,
        "Number of Playwright tests that failed.",
        |s| s.failed as i64,
    ),
    (
        SKIPPED,
        "Number of Playwright tests that were skipped.",
        |s| s.skipped as i64,
    ),
    (
        DURATION,
        "Total duration of all Playwright tests in milliseconds.",
        MetricsSnapshot::duration_millis,
    ),
];

/// Build the export gauges for a snapshot, in export order
///
/// # Errors
///
/// Returns an error if prometheus rejects a metric name or help string.
pub fn gauges(snapshot: &MetricsSnapshot) -> AppResult<Vec<IntGauge>> {
    GAUGES
        .iter()
        .map(|(name, help, value)| -> AppResult<IntGauge> {
            let gauge = IntGauge::with_opts(Opts::new(*name, *help))?;
            gauge.set(value(snapshot));
            Ok(gauge)
        })
        .collect()
}

/// Render a snapshot as the Pushgateway payload
pub fn render(snapshot: &MetricsSnapshot) -> AppResult<String> {
    let mut payload = String::new();

    for gauge in gauges(snapshot)? {
        for desc in gauge.desc() {
            payload.push_str(&format!("# TYPE {} gauge\n", desc.fq_name));
            payload.push_str(&format!("# HELP {} {}\n", desc.fq_name, desc.help));
            payload.push_str(&format!("{} {}\n", desc.fq_name, gauge.get()));
        }
    }

    Ok(payload)
}
