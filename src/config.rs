//! Configuration management for playwright-push
//!
//! Settings come from three layers, highest precedence first:
//! 1. command-line flags and their environment fallbacks (`PUSHGATEWAY_URL`,
//!    `GITHUB_RUN_ID`)
//! 2. an optional TOML config file
//! 3. built-in defaults
//!
//! [`ExportConfig::resolve`] merges the layers into the explicit record the
//! export pipeline runs from.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::cli::ExportArgs;
use crate::error::{AppError, AppResult};

/// Results file read when nothing else is configured
pub const DEFAULT_RESULTS_PATH: &str = "test-results.json";

/// Instance label used when no run id is available (e.g. outside CI)
pub const DEFAULT_RUN_ID: &str = "local_run";

/// Upper bound for the optional push timeout
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root of the optional TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pushgateway: PushgatewayConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Pushgateway settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushgatewayConfig {
    pub url: Option<String>,
    pub run_id: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Input report settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_results_path")]
    pub path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: default_results_path(),
        }
    }
}

fn default_results_path() -> PathBuf {
    PathBuf::from(DEFAULT_RESULTS_PATH)
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Read, parse and validate are reported separately so the cause is obvious
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        let config: Self = toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display.clone(),
            source,
        })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`. Values that are absent are
    /// not checked here; [`ExportConfig::resolve`] checks the merged result.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(url) = &self.pushgateway.url {
            normalize_endpoint(url)?;
        }
        if let Some(timeout) = self.pushgateway.timeout_seconds {
            validate_timeout(timeout)?;
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}

/// Default to http for a scheme-less URL (as curl does); reject other schemes
fn normalize_endpoint(url: &str) -> AppResult<String> {
    match url.split_once("://") {
        None => Ok(format!("http://{}", url)),
        Some(("http" | "https", _)) => Ok(url.to_string()),
        Some((scheme, _)) => Err(AppError::Config(format!(
            "Pushgateway URL '{}' uses unsupported scheme '{}', expected http:// or https://",
            url, scheme
        ))),
    }
}

fn validate_timeout(timeout_seconds: u64) -> AppResult<()> {
    if timeout_seconds == 0 || timeout_seconds > MAX_TIMEOUT_SECONDS {
        return Err(AppError::Config(format!(
            "Push timeout must be between 1 and {} seconds, got {}",
            MAX_TIMEOUT_SECONDS, timeout_seconds
        )));
    }
    Ok(())
}

/// Treat unset and blank values alike (`PUSHGATEWAY_URL=` in CI is common)
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Fully resolved settings for one export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub endpoint: String,
    pub run_id: String,
    pub results_path: PathBuf,
    pub timeout: Option<Duration>,
}

impl ExportConfig {
    /// Merge CLI/env arguments over the optional config file
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if no Pushgateway URL is configured or a
    /// merged value is invalid. Nothing is read from disk here, so a missing
    /// endpoint is reported before any input or network work.
    pub fn resolve(args: &ExportArgs, file: Option<&Config>) -> AppResult<Self> {
        let file_push = file.map(|c| &c.pushgateway);

        let endpoint = non_blank(args.pushgateway_url.as_deref())
            .or_else(|| non_blank(file_push.and_then(|p| p.url.as_deref())))
            .ok_or_else(|| {
                AppError::Config(
                    "Pushgateway URL is not set. Set PUSHGATEWAY_URL, pass --pushgateway-url, \
                     or add [pushgateway] url to the config file"
                        .to_string(),
                )
            })?;
        let endpoint = normalize_endpoint(endpoint)?;

        let run_id = non_blank(args.run_id.as_deref())
            .or_else(|| non_blank(file_push.and_then(|p| p.run_id.as_deref())))
            .unwrap_or(DEFAULT_RUN_ID);

        let timeout = match args
            .timeout_seconds
            .or_else(|| file_push.and_then(|p| p.timeout_seconds))
        {
            Some(seconds) => {
                validate_timeout(seconds)?;
                Some(Duration::from_secs(seconds))
            }
            None => None,
        };

        Ok(Self {
            endpoint,
            run_id: run_id.to_string(),
            results_path: Self::results_path(args, file),
            timeout,
        })
    }

    /// Results file location without requiring a Pushgateway (used by dry runs)
    pub fn results_path(args: &ExportArgs, file: Option<&Config>) -> PathBuf {
        args.results
            .clone()
            .or_else(|| file.map(|c| c.report.path.clone()))
            .unwrap_or_else(default_results_path)
    }
}

/// Effective default log level: CLI flag, then config file, then "info"
pub fn log_level(args: &ExportArgs, file: Option<&Config>) -> String {
    args.log_level
        .clone()
        .or_else(|| file.map(|c| c.observability.log_level.clone()))
        .unwrap_or_else(default_log_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const TEST_CONFIG: &str = r#"
[pushgateway]
url = "http://pushgateway.monitoring:9091"
run_id = "nightly"
timeout_seconds = 15

[report]
path = "reports/results.json"

[observability]
log_level = "debug"
"#;

    #[test]
    fn test_config_from_str_parses_successfully() {
        let config = Config::from_str(TEST_CONFIG).expect("should parse config");
        assert_eq!(
            config.pushgateway.url.as_deref(),
            Some("http://pushgateway.monitoring:9091")
        );
        assert_eq!(config.pushgateway.run_id.as_deref(), Some("nightly"));
        assert_eq!(config.pushgateway.timeout_seconds, Some(15));
        assert_eq!(config.report.path, PathBuf::from("reports/results.json"));
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").expect("empty config is valid");
        assert!(config.pushgateway.url.is_none());
        assert_eq!(config.report.path, PathBuf::from(DEFAULT_RESULTS_PATH));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_config_validation_rejects_unsupported_scheme() {
        let result = Config::from_str("[pushgateway]\nurl = \"ftp://pushgateway:9091\"\n");
        let err = result.expect_err("ftp URL must fail");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_config_accepts_url_without_scheme() {
        let config = Config::from_str("[pushgateway]\nurl = \"pushgateway:9091\"\n")
            .expect("scheme-less URL is accepted");
        assert_eq!(config.pushgateway.url.as_deref(), Some("pushgateway:9091"));
    }

    #[test]
    fn test_resolve_defaults_scheme_less_endpoint_to_http() {
        let args = ExportArgs {
            pushgateway_url: Some("pushgateway:9091".to_string()),
            ..ExportArgs::default()
        };
        let config = ExportConfig::resolve(&args, None).expect("should resolve");
        assert_eq!(config.endpoint, "http://pushgateway:9091");
    }

    #[test]
    fn test_resolve_keeps_https_endpoint() {
        let args = ExportArgs {
            pushgateway_url: Some("https://gw.example.com".to_string()),
            ..ExportArgs::default()
        };
        let config = ExportConfig::resolve(&args, None).expect("should resolve");
        assert_eq!(config.endpoint, "https://gw.example.com");
    }

    #[test]
    fn test_config_validation_zero_timeout_fails() {
        let result = Config::from_str("[pushgateway]\ntimeout_seconds = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation_excessive_timeout_fails() {
        let result = Config::from_str("[pushgateway]\ntimeout_seconds = 301\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_without_endpoint_is_config_error() {
        let err = ExportConfig::resolve(&ExportArgs::default(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("PUSHGATEWAY_URL"));
    }

    #[test]
    fn test_resolve_blank_endpoint_is_config_error() {
        let args = ExportArgs {
            pushgateway_url: Some("   ".to_string()),
            ..ExportArgs::default()
        };
        let err = ExportConfig::resolve(&args, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_resolve_defaults() {
        let args = ExportArgs {
            pushgateway_url: Some("http://gw:9091".to_string()),
            ..ExportArgs::default()
        };
        let config = ExportConfig::resolve(&args, None).expect("should resolve");
        assert_eq!(config.endpoint, "http://gw:9091");
        assert_eq!(config.run_id, DEFAULT_RUN_ID);
        assert_eq!(config.results_path, PathBuf::from(DEFAULT_RESULTS_PATH));
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_resolve_falls_back_to_config_file() {
        let file = Config::from_str(TEST_CONFIG).expect("should parse config");
        let config =
            ExportConfig::resolve(&ExportArgs::default(), Some(&file)).expect("should resolve");
        assert_eq!(config.endpoint, "http://pushgateway.monitoring:9091");
        assert_eq!(config.run_id, "nightly");
        assert_eq!(config.results_path, PathBuf::from("reports/results.json"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_resolve_args_override_config_file() {
        let file = Config::from_str(TEST_CONFIG).expect("should parse config");
        let args = ExportArgs {
            pushgateway_url: Some("https://override:9091".to_string()),
            run_id: Some("987654".to_string()),
            results: Some(PathBuf::from("other.json")),
            timeout_seconds: Some(5),
            log_level: Some("warn".to_string()),
            dry_run: false,
        };
        let config = ExportConfig::resolve(&args, Some(&file)).expect("should resolve");
        assert_eq!(config.endpoint, "https://override:9091");
        assert_eq!(config.run_id, "987654");
        assert_eq!(config.results_path, PathBuf::from("other.json"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(log_level(&args, Some(&file)), "warn");
    }

    #[test]
    fn test_resolve_rejects_invalid_cli_timeout() {
        let args = ExportArgs {
            pushgateway_url: Some("http://gw:9091".to_string()),
            timeout_seconds: Some(0),
            ..ExportArgs::default()
        };
        assert!(ExportConfig::resolve(&args, None).is_err());
    }

    #[test]
    fn test_blank_run_id_uses_default() {
        let args = ExportArgs {
            pushgateway_url: Some("http://gw:9091".to_string()),
            run_id: Some(String::new()),
            ..ExportArgs::default()
        };
        let config = ExportConfig::resolve(&args, None).expect("should resolve");
        assert_eq!(config.run_id, DEFAULT_RUN_ID);
    }

    #[test]
    fn test_log_level_defaults_to_info() {
        assert_eq!(log_level(&ExportArgs::default(), None), "info");
    }
}
