//! The export pipeline: load, aggregate, render, push
//!
//! Strictly linear with no retries. The first failing stage ends the run.

use std::path::Path;

use crate::aggregate::{MetricsSnapshot, aggregate};
use crate::config::ExportConfig;
use crate::error::AppResult;
use crate::exposition;
use crate::push::PushClient;
use crate::report::ResultsDocument;

/// Aggregate the results file and push the gauges to the Pushgateway
///
/// Returns the snapshot that was pushed.
pub async fn run(config: &ExportConfig) -> AppResult<MetricsSnapshot> {
    let client = PushClient::new(&config.endpoint, config.timeout)?;

    let (snapshot, payload) = prepare(&config.results_path)?;

    tracing::info!(
        url = %client.push_url(&config.run_id),
        "Attempting to push metrics to Pushgateway"
    );
    client.push(&config.run_id, payload).await?;

    tracing::info!(
        run_id = %config.run_id,
        total = snapshot.total,
        passed = snapshot.passed,
        failed = snapshot.failed,
        skipped = snapshot.skipped,
        duration_ms = snapshot.duration_millis(),
        "Metrics pushed successfully"
    );

    Ok(snapshot)
}

/// Build the payload without touching the network
pub fn dry_run(results_path: &Path) -> AppResult<String> {
    let (_, payload) = prepare(results_path)?;
    Ok(payload)
}

fn prepare(results_path: &Path) -> AppResult<(MetricsSnapshot, String)> {
    let document = ResultsDocument::from_file(results_path)?;
    let snapshot = aggregate(&document);

    if snapshot.other > 0 {
        tracing::debug!(
            other = snapshot.other,
            "Tests with a status other than passed/failed/skipped are counted in total only"
        );
    }

    let payload = exposition::render(&snapshot)?;
    Ok((snapshot, payload))
}
