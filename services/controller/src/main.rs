mod cli;
mod config;
mod csv_writer;
mod input;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::ControllerConfig;
use service::ControllerHarness;

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ControllerConfig::load_or_default(cli.config.as_deref())?
        .with_base_url(cli.base_url.clone());
    init_logging(&config.log_level);

    let harness = ControllerHarness::connect(config)?.with_speed_override(cli.speed);
    let report = harness.execute(cli.command).await?;

    let json = serde_json::to_string_pretty(&report).context("serializing report")?;
    println!("{json}");
    Ok(())
}
