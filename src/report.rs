//! Playwright JSON report model
//!
//! Only the fields needed for aggregation are modelled. Access is best-effort:
//! `suites` is required at the root, every nested array defaults to empty, and
//! a malformed `status` or `duration` degrades to "other" / absent instead of
//! rejecting the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Root of a results file produced by Playwright's JSON reporter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsDocument {
    pub suites: Vec<Suite>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Suite {
    #[serde(default)]
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Spec {
    #[serde(default)]
    pub tests: Vec<Test>,
}

/// A single test; each retry attempt appends another entry to `results`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Test {
    #[serde(default)]
    pub results: Vec<TestResult>,
}

impl Test {
    /// Outcome of the first attempt, if the test ran at all
    pub fn first_result(&self) -> Option<&TestResult> {
        self.results.first()
    }
}

/// Outcome of one execution attempt
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TestResult {
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ResultStatus,
    /// Milliseconds; `None` when missing or not a number
    #[serde(default, deserialize_with = "lenient_duration")]
    pub duration: Option<f64>,
}

/// Status of an attempt as far as the exported gauges care
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultStatus {
    Passed,
    Failed,
    Skipped,
    /// `timedOut`, `interrupted`, missing, or anything unrecognised
    #[default]
    Other,
}

impl From<&str> for ResultStatus {
    fn from(status: &str) -> Self {
        match status {
            "passed" => ResultStatus::Passed,
            "failed" => ResultStatus::Failed,
            "skipped" => ResultStatus::Skipped,
            _ => ResultStatus::Other,
        }
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<ResultStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => ResultStatus::from(s.as_str()),
        _ => ResultStatus::Other,
    })
}

fn lenient_duration<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

impl ResultsDocument {
    /// Load a results document from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ResultsRead {
                path: path_display.clone(),
                source,
            })?;

        let document: Self =
            serde_json::from_str(&content).map_err(|source| AppError::ResultsParse {
                path: path_display.clone(),
                source,
            })?;

        tracing::debug!(
            path = %path_display,
            suites = document.suites.len(),
            "Loaded results document"
        );

        Ok(document)
    }

    /// Iterate every test in document order (suite, then spec, then test)
    pub fn tests(&self) -> impl Iterator<Item = &Test> {
        self.suites
            .iter()
            .flat_map(|suite| suite.specs.iter())
            .flat_map(|spec| spec.tests.iter())
    }
}

impl FromStr for ResultsDocument {
    type Err = AppError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(json).map_err(|source| AppError::ResultsParse {
            path: "<string>".to_string(),
            source,
        })
    }
}
