//! Matchday cache maintenance server
//!
//! Runs the application caches over a file-backed store and exposes the
//! maintenance API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchday::api::{create_router, AppState};
use matchday::storage::FileStore;
use matchday::{AppContext, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the application context over the file store
/// 4. Start the object cache sweep
/// 5. Serve the maintenance API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to info for this crate, overridable with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchday=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Matchday cache server");

    let config = Config::from_env();
    let storage_dir = config.resolved_storage_dir();
    info!(
        object_default_ttl = config.object_default_ttl,
        sweep_interval = config.sweep_interval,
        media_max_entries = config.media_max_entries,
        storage_dir = %storage_dir.display(),
        port = config.server_port,
        "Configuration loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let ctx = Arc::new(AppContext::new(config, Arc::new(FileStore::new(storage_dir))));
    ctx.start();
    info!("Object cache sweep started");

    let app = create_router(AppState::from_shared(Arc::clone(&ctx)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    ctx.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
