//! Pushgateway client
//!
//! Sends one exposition payload with a single POST. There are no retries: a
//! failed push fails the CI step, and the next run pushes again.

use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Pushgateway job label for every upload
pub const JOB_NAME: &str = "playwright_tests";

pub struct PushClient {
    client: reqwest::Client,
    base_url: String,
}

impl PushClient {
    /// Create a client for the Pushgateway at `base_url`
    ///
    /// A trailing `/` on `base_url` is dropped. Without a `timeout` the
    /// request waits as long as the transport allows.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| AppError::HttpClient { source })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Grouping-key URL for a run; `run_id` is inserted verbatim
    pub fn push_url(&self, run_id: &str) -> String {
        format!(
            "{}/metrics/job/{}/instance/{}",
            self.base_url, JOB_NAME, run_id
        )
    }

    /// POST `payload` under the `run_id` instance label
    ///
    /// # Errors
    ///
    /// - [`AppError::PushFailed`] if the request could not be completed
    ///   (connection refused, timeout, ...)
    /// - [`AppError::PushRejected`] if the gateway answered with a non-2xx status
    pub async fn push(&self, run_id: &str, payload: String) -> AppResult<()> {
        let url = self.push_url(run_id);
        let payload_bytes = payload.len();

        tracing::debug!(url = %url, payload_bytes, "Pushing metrics");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/plain")
            .body(payload)
            .send()
            .await
            .map_err(|source| AppError::PushFailed {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Failed to read Pushgateway error body");
                String::new()
            });
            tracing::debug!(url = %url, status = %status, "Pushgateway rejected metrics");
            return Err(AppError::push_rejected(url, status.as_u16(), &body));
        }

        tracing::debug!(url = %url, status = %status, "Pushgateway accepted metrics");
        Ok(())
    }
}
