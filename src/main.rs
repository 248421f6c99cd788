//! Fibr: self-hosted file browser.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use fibr_api::{AppState, build_app};
use fibr_auth::BasicUserAuthenticator;
use fibr_core::config::AppConfig;
use fibr_core::error::AppError;
use fibr_core::traits::jobs::{JobSubmitter, NoopSubmitter};
use fibr_core::traits::storage::Storage;
use fibr_core::types::ThumbnailJob;
use fibr_service::{AccessService, CrudService, JsonFileShareStore, ShareRegistry};
use fibr_storage::{ImageRenderer, LocalStorage, Thumbnailer};
use fibr_worker::{CronScheduler, JobExecutor, ThumbnailQueue, WorkerRunner};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("FIBR_CONFIG").unwrap_or_else(|_| "config/fibr.toml".to_string());
    let env = std::env::var("FIBR_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
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
    tracing::info!("Starting Fibr v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Open the served root ─────────────────────────────
    let storage: Arc<dyn Storage> =
        Arc::new(LocalStorage::new(&config.storage.root_directory).await?);
    tracing::info!(
        "Serving '{}' ({})",
        config.storage.root_directory,
        storage.storage_type()
    );

    // ── Step 2: Load the share registry ──────────────────────────
    let share_store = Arc::new(JsonFileShareStore::new(Arc::clone(&storage)));
    let registry = Arc::new(ShareRegistry::load(share_store).await?);
    tracing::info!("Loaded {} share(s)", registry.list().await.len());

    // ── Step 3: Initialize authentication ────────────────────────
    let authenticator = Arc::new(BasicUserAuthenticator::from_config(&config.auth)?);
    if authenticator.user_count() == 0 {
        tracing::warn!("No user configured, only shares are reachable");
    }

    // ── Step 4: Thumbnail engine ─────────────────────────────────
    let thumbnailer = Thumbnailer::new(
        Arc::clone(&storage),
        Arc::new(ImageRenderer),
        config.thumbnail.size,
    );

    // ── Step 5: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 6: Start background worker ──────────────────────────
    let (jobs, worker_handle, scheduler): (Arc<dyn JobSubmitter>, _, _) =
        if config.thumbnail.enabled {
            let (queue, receiver) = ThumbnailQueue::bounded(config.thumbnail.queue_capacity);
            let queue: Arc<dyn JobSubmitter> = Arc::new(queue);

            let executor = Arc::new(JobExecutor::new(thumbnailer.clone()));
            let worker_runner = WorkerRunner::new(executor, receiver);
            let worker_cancel = shutdown_rx.clone();
            let handle = tokio::spawn(async move {
                worker_runner.run(worker_cancel).await;
            });
            tracing::info!("Thumbnail worker started");

            if config.thumbnail.walk_on_startup {
                queue.submit(ThumbnailJob::Walk);
            }

            let scheduler = match &config.thumbnail.walk_schedule {
                Some(schedule) => {
                    let scheduler = CronScheduler::new(Arc::clone(&queue)).await?;
                    scheduler.register_walk(schedule).await?;
                    scheduler.start().await?;
                    Some(scheduler)
                }
                None => None,
            };

            (queue, Some(handle), scheduler)
        } else {
            tracing::info!("Thumbnails disabled");
            (Arc::new(NoopSubmitter) as Arc<dyn JobSubmitter>, None, None)
        };

    // ── Step 7: Initialize services ──────────────────────────────
    let crud = Arc::new(CrudService::new(
        Arc::clone(&storage),
        Arc::clone(&registry),
        thumbnailer.clone(),
        jobs,
        config.ui.clone(),
        config.storage.max_upload_size_bytes,
    ));
    let access = Arc::new(AccessService::new(Arc::clone(&registry), authenticator));

    // ── Step 8: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app_state = AppState::new(Arc::new(config), access, crud, thumbnailer);
    let app = build_app(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Fibr listening on {}", addr);

    // ── Step 9: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 10: Wait for background tasks ───────────────────────
    if let Some(mut scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!("Scheduler shutdown failed: {}", e);
        }
    }

    if let Some(handle) = worker_handle {
        tracing::info!("Draining thumbnail queue...");
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Thumbnail worker did not finish within {:?}", grace);
        }
    }

    tracing::info!("Fibr shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
