use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use configs::AppConfig;
use migration::MigratorTrait;
use service::auth::repo::seaorm::SeaOrmStorage;
use service::auth::{AuthConfig, AuthService};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::routes::{self, AppState};

/// Open storage, apply migrations and register the configured apps.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    common::env::ensure_storage_dir(&cfg.storage.url).await?;

    let db = models::db::connect_with_config(&cfg.storage)
        .await
        .context("failed to connect to storage")?;
    migration::Migrator::up(&db, None).await.context("failed to apply migrations")?;

    for app in &cfg.apps {
        models::app::upsert(&db, app.id, &app.name, &app.secret)
            .await
            .with_context(|| format!("failed to register app {}", app.id))?;
        info!(app_id = app.id, name = %app.name, "app registered");
    }

    let storage = Arc::new(SeaOrmStorage::new(db));
    let auth = AuthService::with_storage(storage, AuthConfig::new(cfg.token_ttl()));
    Ok(AppState::new(auth))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
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
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "ctrl_c", "shutdown signal received"),
        _ = terminate => info!(signal = "sigterm", "shutdown signal received"),
    }
}

/// Public entry: build the app and serve until a shutdown signal arrives.
/// In-flight requests are drained before this returns.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = routes::build_router(state, cfg.server.timeout());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.server.host, cfg.server.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "auth server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("auth server stopped");
    Ok(())
}
