use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

pub mod codec;
pub mod config;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod kafka;
pub mod models;
pub mod publisher;
pub mod routes;

use gateway::NotificationGateway;

/// Bind the HTTP listener on all interfaces
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr: SocketAddr = format!("[::]:{}", port)
        .parse()
        .context("Failed to parse bind address")?;

    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))
}

/// Serve requests until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn run_http_server<F>(
    gateway: Arc<NotificationGateway>,
    listener: TcpListener,
    shutdown: F,
) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = routes::create_router(gateway);

    info!("Notification gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Shutting down...");
}
