//! FormScore command-line binary.

use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use formscore_service::{cli, Cli, FormScoreService, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    let config = ServiceConfig::from_env();

    // Logs go to stderr; stdout carries command output
    let env_filter = EnvFilter::from_default_env().add_directive("formscore=info".parse()?);

    if config.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let metrics_handle = if args.emit_metrics {
        Some(
            PrometheusBuilder::new()
                .install_recorder()
                .context("Failed to install Prometheus recorder")?,
        )
    } else {
        None
    };

    info!("Starting formscore");

    let service = FormScoreService::from_config(&config)?;

    let mut stdout = std::io::stdout().lock();
    let result = cli::execute(args.command, &service, &mut stdout).await;

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }

    result
}
