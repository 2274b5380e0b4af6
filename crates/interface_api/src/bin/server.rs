//! Client Console - API Server Binary
//!
//! This binary starts the HTTP API server for the client console.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (in-memory client store)
//! cargo run --bin client-console-api
//!
//! # Run against the client REST API
//! API_CLIENT_SOURCE=remote API_REMOTE_BASE_URL=https://... cargo run --bin client-console-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_CLIENT_SOURCE` - `memory` or `remote` (default: memory)
//! * `API_REMOTE_BASE_URL` - Base URL of the client API (required for remote)
//! * `API_REMOTE_TOKEN` - Bearer token for the client API
//! * `API_REMOTE_TIMEOUT_SECS` - Client API request timeout (default: 30)
//! * `API_SESSION_IDLE_SECS` - Idle time before a wizard session is dropped (default: 1800)

use anyhow::Context;
use interface_api::{config::ApiConfig, router, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Invalid API_* configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        client_source = ?config.client_source,
        "Starting client console API server"
    );

    let port = config.client_port().context("Failed to set up client store")?;

    // a backend that is down at boot is not fatal; readiness reports it
    let health = port.health_check().await;
    if health.status.is_ready() {
        tracing::info!(adapter = %health.adapter, latency_ms = health.latency_ms, "Client store reachable");
    } else {
        tracing::warn!(
            adapter = %health.adapter,
            detail = health.detail.as_deref().unwrap_or("-"),
            "Client store not reachable at startup"
        );
    }

    let state = AppState::new(config.clone(), port);
    state.sessions.spawn_sweeper(config.session_idle());
    let app = router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `API_LOG_LEVEL`
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!(signal = "SIGINT", "Shutting down");
        }
        _ = terminate => {
            tracing::info!(signal = "SIGTERM", "Shutting down");
        }
    }
}
