//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::{Config, SessionDriver};
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database, RedisSessionStore, SessionBackend};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let db = Arc::new(db);

    let (sessions, cache) = session_store(&config).await?;

    tokio::fs::create_dir_all(&config.public_path)
        .await
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create {}: {}",
                config.public_path.display(),
                e
            ))
        })?;

    let addr = config.server_addr();
    let app = create_router(AppState::from_config(db, cache, sessions, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

async fn session_store(config: &Config) -> AppResult<(SessionBackend, Option<Arc<Cache>>)> {
    match config.session_driver {
        SessionDriver::Memory => {
            tracing::info!("Using in-memory session store");
            Ok((SessionBackend::memory(), None))
        }
        SessionDriver::Redis => {
            let cache = Cache::connect(config)
                .await
                .map_err(|e| AppError::internal(format!("Redis connection failed: {}", e)))?;
            tracing::info!("Redis session store connected");

            let sessions = SessionBackend::Redis(RedisSessionStore::new(cache.clone()));
            Ok((sessions, Some(Arc::new(cache))))
        }
    }
}
