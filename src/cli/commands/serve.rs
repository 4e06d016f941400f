use anyhow::Context;

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::{app, AppState};

/// Refuse to start with settings that would fail every login or guarded request.
fn check_security(config: &AppConfig) -> anyhow::Result<()> {
    if config.security.jwt_secret.trim().is_empty() {
        anyhow::bail!(
            "SECRET_KEY must be set in {:?} mode (tokens cannot be signed{})",
            config.environment,
            if config.security.require_auth { " and /tpo, /admin would reject every request" } else { "" }
        );
    }
    Ok(())
}

pub async fn handle(config: AppConfig, port: Option<u16>, skip_migrations: bool) -> anyhow::Result<()> {
    tracing::info!("Starting PrepSphere API in {:?} mode", config.environment);
    check_security(&config)?;

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    if config.database.run_migrations && !skip_migrations {
        DatabaseManager::migrate(&pool).await.context("failed to apply migrations")?;
    }

    if !config.security.require_auth {
        tracing::warn!("Role checks on /tpo and /admin are disabled");
    }

    let port = port.unwrap_or(config.api.port);
    let state = AppState::new(pool, config).context("failed to initialise storage or mail")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("PrepSphere API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
