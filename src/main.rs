use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sluice::batch;
use sluice::cli::Cli;
use sluice::config::FileConfig;
use sluice::worker;

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout carries the report (and the wire
    // protocol in worker mode)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let file = FileConfig::load()?;
    let config = cli.run_config(&file);

    if cli.worker {
        worker::run(&config)?;
        return Ok(());
    }

    let report = batch::run(&cli.urls, &config)?;

    if report.failed() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
