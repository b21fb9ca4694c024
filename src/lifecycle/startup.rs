//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the optional metrics exporter
//! - Build the server (upstream client, engine, gate)
//! - Bind the listener and serve until a stop signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Bring the proxy up and block until it has shut down.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    tracing::info!(
        port = config.listener.port,
        base_domain = %config.upstream.base_domain,
        timeout_secs = config.upstream.timeout_secs,
        max_retries = config.retries.max_retries,
        pinned_paths = ?config.upstream.pinned_paths,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let address = config.listener.bind_address();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    spawn_signal_handler(&shutdown);

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
