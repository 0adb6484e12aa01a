//! Error types for playwright-push
//!
//! Every failure is fatal. Variants are grouped into an [`ErrorKind`] which
//! decides the process exit code.

use thiserror::Error;

/// Maximum number of response body characters kept in a rejected push error
const BODY_PREVIEW_CHARS: usize = 500;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config '{path}': {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config file '{path}': {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Failed to read results file '{path}': {source}")]
    ResultsRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse results file '{path}' as JSON: {source}")]
    ResultsParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to build HTTP client: {source}")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to push metrics to {url}: {source}")]
    PushFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Pushgateway at {url} rejected metrics with HTTP {status}: {body}")]
    PushRejected {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to build metric: {0}")]
    Metric(#[from] prometheus::Error),
}

/// Coarse classification of [`AppError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration
    Config,
    /// Results file missing, unreadable or malformed
    Input,
    /// Network submission failed
    Transport,
    /// Bug or library failure unrelated to user input
    Internal,
}

impl ErrorKind {
    /// Process exit code reported for this kind of failure
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorKind::Internal => 1,
            ErrorKind::Config => 2,
            ErrorKind::Input => 3,
            ErrorKind::Transport => 4,
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. } => ErrorKind::Config,
            Self::ResultsRead { .. } | Self::ResultsParse { .. } => ErrorKind::Input,
            Self::HttpClient { .. } | Self::PushFailed { .. } | Self::PushRejected { .. } => {
                ErrorKind::Transport
            }
            Self::Metric(_) => ErrorKind::Internal,
        }
    }

    /// Build a [`AppError::PushRejected`], truncating the body to a short preview
    pub fn push_rejected(url: impl Into<String>, status: u16, body: &str) -> Self {
        let mut preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
        if body.chars().count() > BODY_PREVIEW_CHARS {
            preview.push_str("...");
        }
        Self::PushRejected {
            url: url.into(),
            status,
            body: preview,
        }
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
