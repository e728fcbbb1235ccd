//! memoria-server: active-item resolution and its HTTP surface.
//!
//! This crate ties the store and core crates into a running server:
//!
//! - [`resolver`]: wrap-around resolution of a user's active item
//! - [`identity`]: pluggable verification of the user named in the path
//! - Axum router with request ids, CORS and request tracing
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod resolver;
pub mod router;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use memoria_core::config::Config;
use memoria_store::{DocumentStore, SqliteStore};

use crate::context::AppContext;

/// Open the SQLite store named in `config.server.db_path`, creating its
/// directory if needed.
pub fn open_store(config: &Config) -> memoria_core::Result<SqliteStore> {
    let db_path = &config.server.db_path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db_str = db_path.to_string_lossy();
    let pool = memoria_store::pool::init_pool(&db_str)?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }
    Ok(SqliteStore::new(pool))
}

/// Start the memoria server.
///
/// Opens the store, builds the [`AppContext`] and serves HTTP until a
/// shutdown signal is received.
pub async fn start(config: Config) -> memoria_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let store: Arc<dyn DocumentStore> = Arc::new(open_store(&config)?);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| memoria_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::new(store, config);
    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| memoria_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_store_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.db_path = dir.path().join("nested/memoria.db");
        open_store(&config).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
