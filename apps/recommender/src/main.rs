mod cli;
mod config;
mod courses;
mod errors;
mod extract;
mod llm_client;
mod model;
mod recommendation;
mod routes;
mod state;

#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration first (fails on malformed numeric values)
    let config = Config::from_env()?;

    // Logs go to stderr so `analyze` output on stdout stays pure JSON
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting recommender v{}", env!("CARGO_PKG_VERSION"));

    cli::run(cli, config).await
}
