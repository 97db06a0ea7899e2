//! Thin axum façade over `hostgraph-query`: loads the embedded sparse
//! indices once at startup and serves range-backed lookups over HTTP.

pub mod api;
pub mod config;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;

use config::Config;
use state::ServerState;

/// Respects `RUST_LOG` (default `info,tower_http=debug`), matching the
/// teacher's query-server logging setup.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Waits for SIGINT or (on unix) SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown");
}

pub async fn serve(config: Config) -> Result<()> {
    let port = config.port;
    let state = Arc::new(ServerState::load(&config)?);
    let app = api::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(port, "server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}
