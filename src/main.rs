//! playwright-push CLI
//!
//! One-shot CI step: read the Playwright report, aggregate it, push the gauges.

use clap::Parser;
use playwright_push::{
    cli::{Cli, Command, generate_config_template},
    config::{self, Config, ExportConfig},
    error::{AppError, AppResult},
    export, telemetry,
};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::from(e.kind().exit_code())
        }
    }
}

async fn execute(cli: Cli) -> AppResult<()> {
    if let Some(Command::Config { output }) = cli.command {
        return write_template(output.as_deref());
    }

    let file_config = cli.config.as_deref().map(Config::from_file).transpose()?;

    telemetry::init(&config::log_level(&cli.export, file_config.as_ref()));

    if cli.export.dry_run {
        let results_path = ExportConfig::results_path(&cli.export, file_config.as_ref());
        let payload = export::dry_run(&results_path)?;
        print!("{}", payload);
        return Ok(());
    }

    let export_config = ExportConfig::resolve(&cli.export, file_config.as_ref())?;
    tracing::debug!(
        endpoint = %export_config.endpoint,
        run_id = %export_config.run_id,
        results = %export_config.results_path.display(),
        "Resolved export configuration"
    );

    export::run(&export_config).await?;
    Ok(())
}

fn write_template(output: Option<&str>) -> AppResult<()> {
    let template = generate_config_template();
    match output {
        Some(path) => std::fs::write(path, template).map_err(|e| {
            AppError::Config(format!("Failed to write config template to '{}': {}", path, e))
        }),
        None => {
            print!("{}", template);
            Ok(())
        }
    }
}

/// Report a fatal error on stderr regardless of the tracing filter
///
/// Display strings already embed their source error, so the message is the
/// full cause.
fn report_error(error: &AppError) {
    eprintln!(
        "Error processing test results or pushing to Pushgateway: {}",
        error
    );
    tracing::error!(kind = ?error.kind(), error = %error, "Export failed");
}
