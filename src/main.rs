//! FileTrack Server: inter-department file tracking and forwarding.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use filetrack_api::{AppState, build_router};
use filetrack_core::config::{AppConfig, LogFormat, StoreBackend};
use filetrack_core::error::AppError;
use filetrack_database::{DatabasePool, MemoryStore, Stores};
use filetrack_service::{LogMailer, QueuedDispatcher, Services};

#[tokio::main]
async fn main() {
    let env = std::env::var("FILETRACK_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. `RUST_LOG` overrides the configured level.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FileTrack v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores ───────────────────────────────────────────
    let (stores, pool) = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            (Stores::postgres(pool.pool().clone()), Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            (Stores::memory(MemoryStore::new()), None)
        }
    };

    // ── Step 2: Notification outbox ──────────────────────────────
    let dispatcher = QueuedDispatcher::start(
        stores.users.clone(),
        stores.notifications.clone(),
        Arc::new(LogMailer),
        config.notifications.clone(),
    );

    // ── Step 3: Services ─────────────────────────────────────────
    let services = Services::new(&stores, &config, dispatcher.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let purge_handle = Arc::clone(&services.notifications).spawn_purge_task(
        Duration::from_secs(config.notifications.purge_interval_seconds.max(1)),
        shutdown_rx,
    );

    // ── Step 4: HTTP server ──────────────────────────────────────
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = build_router(AppState::new(config, services));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(address = %addr, "FileTrack server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Drain background work ────────────────────────────
    tracing::info!("Shutting down background tasks");
    let _ = shutdown_tx.send(true);
    let drain = async {
        dispatcher.shutdown().await;
        if let Err(e) = purge_handle.await {
            tracing::warn!(error = %e, "Purge task ended abnormally");
        }
    };
    if tokio::time::timeout(grace, drain).await.is_err() {
        tracing::warn!(grace_seconds = grace.as_secs(), "Background tasks did not finish in time");
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("FileTrack server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
