//! Subdomain fan-out edge proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                     EDGE PROXY                       │
//!                      │                                                      │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌──────────────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│ security │──▶│      proxy       │   │
//!                      │  │ server  │   │  access  │   │ forwarding engine│   │
//!                      │  └─────────┘   │   gate   │   └────────┬─────────┘   │
//!                      │                └──────────┘            │             │
//!                      │                          ┌─────────────┼──────────┐  │
//!                      │                          ▼             ▼          ▼  │
//!                      │                   ┌──────────┐ ┌──────────┐ ┌──────┐ │
//!                      │                   │ routing  │ │ security │ │resil-│ │
//!                      │                   │URL mapper│ │ headers  │ │ience │ │
//!                      │                   └──────────┘ └──────────┘ └──────┘ │
//!                      │                                        │             │
//!   Client Response    │  ┌─────────┐                  ┌────────▼─────────┐   │
//!   ◀──────────────────┼──│response │◀─────────────────│ upstream client  │◀──┼── {sub}.{base}
//!                      │  │ relay   │                  │ (pooled reqwest) │   │
//!                      │  └─────────┘                  └──────────────────┘   │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use edge_proxy::config::load_config;
use edge_proxy::lifecycle::startup;
use edge_proxy::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "edge-proxy", version, about = "Subdomain fan-out reverse proxy")]
struct Cli {
    /// Optional TOML configuration file; PORT, TIMEOUT, RETRIES and KEY override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("edge-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
