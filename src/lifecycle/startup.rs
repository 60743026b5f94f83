//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Build the gateway from a validated configuration
//! - Bind the listener last, so traffic only arrives when ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::schema::JWT_SECRET_PLACEHOLDER;
use crate::config::GatewayConfig;
use crate::error::StartupError;
use crate::http::GatewayServer;
use crate::observability::metrics;

/// Build and run the gateway until shutdown.
pub async fn start(config: GatewayConfig, shutdown: broadcast::Receiver<()>) -> Result<(), StartupError> {
    log_summary(&config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = GatewayServer::new(config)?;
    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, shutdown).await?;
    Ok(())
}

fn log_summary(config: &GatewayConfig) {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = ?config.services.keys().collect::<Vec<_>>(),
        users = config.auth.users.len(),
        upstream_timeout_secs = ?config.timeouts.upstream_secs,
        "Configuration loaded"
    );
    for (name, service) in &config.services {
        tracing::debug!(service = %name, base_url = %service.base_url, "Upstream registered");
    }
    if config.auth.jwt_secret == JWT_SECRET_PLACEHOLDER {
        tracing::warn!("auth.jwt_secret is the built-in placeholder; set GATEWAY_JWT_SECRET in production");
    }
    if config.auth.users.is_empty() {
        tracing::warn!("No login accounts configured; /auth/login will reject every request");
    }
}
