//! # Kasir API Server
//!
//! ## Startup Sequence
//! ```text
//! 1. Initialize tracing (RUST_LOG, default info,kasir=debug,sqlx=warn)
//! 2. Load configuration (.env, kasir.toml, KASIR__*, PORT / DB_CONN)
//! 3. Open the SQLite pool and run migrations
//! 4. Build engines and router
//! 5. Serve until Ctrl+C / SIGTERM, then close the pool
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use kasir_api::{app, AppConfig, AppState};
use kasir_db::migrations::migration_status;
use kasir_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Kasir API v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("Failed to load configuration")?;
    let offset = config.utc_offset()?;
    let addr = config.socket_addr()?;

    info!(
        host = %config.host,
        port = config.port,
        timezone_offset = %offset,
        database = %config.database.path,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config())
        .await
        .context("Failed to open database")?;

    if !db.health_check().await {
        warn!("Database health check failed after connect");
    }
    match migration_status(db.pool()).await {
        Ok((total, applied)) => info!(total, applied, "Migration status"),
        Err(e) => warn!(error = %e, "Could not read migration status"),
    }

    let state = AppState::new(Arc::new(db.store()), offset);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Kasir API listening");

    let served = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db.close().await;
    served.context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kasir=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
