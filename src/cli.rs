//! Command-line interface for playwright-push
//!
//! Provides argument parsing and subcommand handling for the binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Push Playwright test-run metrics to a Prometheus Pushgateway
#[derive(Parser)]
#[command(name = "playwright-push")]
#[command(version)]
#[command(about = "Push Playwright test-run metrics to a Prometheus Pushgateway")]
#[command(
    long_about = "Reads a Playwright JSON report, aggregates pass/fail/skip counts and \
    durations, and pushes them as Prometheus gauges to a Pushgateway under \
    job=playwright_tests and instance=<run id>."
)]
pub struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub export: ExportArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings for the default export action
///
/// Every field is optional so unset flags fall through to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Playwright JSON results file [default: test-results.json]
    #[arg(short, long)]
    pub results: Option<PathBuf>,

    /// Base URL of the Pushgateway (http:// is assumed when no scheme is given)
    #[arg(long, env = "PUSHGATEWAY_URL")]
    pub pushgateway_url: Option<String>,

    /// Instance label for this run [default: local_run]
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: Option<String>,

    /// Whole-request timeout for the push (1-300 seconds)
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Default log level when RUST_LOG is not set
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the payload to stdout instead of pushing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# playwright-push Configuration
# ==============================
#
# Every setting here is optional. Command-line flags and the PUSHGATEWAY_URL /
# GITHUB_RUN_ID environment variables take precedence over this file.

# ─────────────────────────────────────────────────────────────────────────────
# PUSHGATEWAY
# ─────────────────────────────────────────────────────────────────────────────

[pushgateway]
# Base URL of the Pushgateway (metrics are POSTed to
# <url>/metrics/job/playwright_tests/instance/<run_id>)
url = "http://localhost:9091"

# Instance label; usually supplied by GITHUB_RUN_ID in CI
run_id = "local_run"

# Whole-request timeout in seconds (1-300). Omit to use the transport default.
# timeout_seconds = 30

# ─────────────────────────────────────────────────────────────────────────────
# REPORT
# ─────────────────────────────────────────────────────────────────────────────

[report]
# Playwright JSON reporter output
path = "test-results.json"

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Clap's built-in verification for the CLI structure
        Cli::command().debug_assert();
    }

    #[test]
    fn default_arguments() {
        let cli = Cli::parse_from(["playwright-push"]);
        assert!(cli.config.is_none());
        assert!(cli.export.results.is_none());
        assert!(!cli.export.dry_run);
        assert!(cli.command.is_none());
    }

    #[test]
    fn explicit_flags() {
        let cli = Cli::parse_from([
            "playwright-push",
            "--results",
            "out/report.json",
            "--pushgateway-url",
            "http://gw:9091",
            "--run-id",
            "42",
            "--timeout-seconds",
            "10",
            "--dry-run",
        ]);
        assert_eq!(cli.export.results, Some(PathBuf::from("out/report.json")));
        assert_eq!(cli.export.pushgateway_url.as_deref(), Some("http://gw:9091"));
        assert_eq!(cli.export.run_id.as_deref(), Some("42"));
        assert_eq!(cli.export.timeout_seconds, Some(10));
        assert!(cli.export.dry_run);
    }

    #[test]
    fn custom_config_path() {
        let cli = Cli::parse_from(["playwright-push", "--config", "push.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("push.toml")));
    }

    #[test]
    fn config_subcommand() {
        let cli = Cli::parse_from(["playwright-push", "config"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: None })
        ));
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["playwright-push", "config", "-o", "push.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "push.toml"
        ));
    }

    #[test]
    fn template_is_valid_toml() {
        let template = generate_config_template();
        let result: Result<toml::Value, _> = toml::from_str(template);
        assert!(
            result.is_ok(),
            "Template should be valid TOML: {:?}",
            result.err()
        );
    }

    #[test]
    fn template_has_all_sections() {
        let template = generate_config_template();
        assert!(template.contains("[pushgateway]"));
        assert!(template.contains("[report]"));
        assert!(template.contains("[observability]"));
    }
}
