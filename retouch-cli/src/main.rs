//! Retouch CLI
//!
//! Command-line front end for the asynchronous image-editing service.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use retouch_core::domain::job::ApiKey;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "retouch")]
#[command(about = "Remove watermarks and enhance images with an async editing service", long_about = None)]
struct Cli {
    /// Service base URL
    #[arg(long, env = "RETOUCH_BASE_URL", default_value = retouch_client::DEFAULT_BASE_URL)]
    base_url: String,

    /// API key sent as bearer credential
    #[arg(long, env = "DASHSCOPE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier used for submissions
    #[arg(long, env = "RETOUCH_MODEL", default_value = retouch_client::DEFAULT_MODEL)]
    model: String,

    /// Seconds between status lookups (overrides RETOUCH_POLL_INTERVAL)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up polling after this many seconds (overrides RETOUCH_MAX_POLL_DURATION)
    #[arg(long)]
    max_poll_duration: Option<u64>,

    /// JSON file describing the available functions
    #[arg(long, env = "RETOUCH_CATALOG")]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retouch=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load(
        cli.base_url,
        cli.api_key.map(ApiKey::new),
        cli.model,
        cli.poll_interval,
        cli.max_poll_duration,
        cli.catalog.as_deref(),
    )?;
    debug!(
        "Loaded configuration: base_url={}, model={}, poll_interval={:?}, functions={}",
        config.base_url,
        config.model,
        config.lifecycle.poll_interval,
        config.catalog.len()
    );

    handle_command(cli.command, &config).await
}
