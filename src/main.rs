//! API Gateway
//!
//! Single entry point in front of the student and course services.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  API GATEWAY                  │
//!   Client Request     │  ┌─────────┐   ┌──────────────┐   ┌────────┐ │
//!   ───────────────────┼─▶│  http   │──▶│ auth gate    │──▶│handler │ │
//!                      │  │ server  │   │ (protected)  │   └───┬────┘ │
//!                      │  └─────────┘   └──────────────┘       │      │
//!                      │                                        ▼      │
//!   Client Response    │  ┌─────────────────┐   ┌──────────────────┐  │
//!   ◀──────────────────┼──│ GatewayError /  │◀──│    Forwarder     │◀─┼── Upstream
//!                      │  │ JSON passthrough│   │ (registry lookup)│  │   service
//!                      │  └─────────────────┘   └──────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use api_gateway::config::loader::{finalize_config, load_config};
use api_gateway::config::GatewayConfig;
use api_gateway::lifecycle::{startup, Shutdown};
use api_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "Authenticating API gateway for the student and course services", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    let config = finalize_config(config)?;

    logging::init_tracing(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        "api-gateway starting"
    );

    let shutdown = Shutdown::new();
    startup::start(config, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
