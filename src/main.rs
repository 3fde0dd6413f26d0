use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use creations_api::api::{self, AppState};
use creations_api::config::{self, Environment};
use creations_api::database::DatabaseManager;
use creations_api::ledger::{CreationLedger, MemoryCreationLedger, PgCreationLedger};
use creations_api::services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    info!("Starting Creations API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        warn!("AUTH_JWT_SECRET is not set; every protected request will be rejected");
    }

    let ledger: Arc<dyn CreationLedger> =
        if config.database.url.is_none() && config.environment == Environment::Development {
            warn!("DATABASE_URL is not set; creations are kept in memory");
            Arc::new(MemoryCreationLedger::new())
        } else {
            let pool = DatabaseManager::connect_lazy(&config.database).context("database configuration")?;
            if let Err(e) = DatabaseManager::ensure_schema(&pool).await {
                warn!(error = %e, "could not ensure the creations schema; continuing");
            }
            Arc::new(PgCreationLedger::new(pool))
        };

    let quota = Arc::new(services::quota_store(config)?);
    let providers = services::providers(&config.providers)?;
    let gateway = services::gateway(config, quota, ledger, providers);

    let app = api::app(AppState::from_config(Arc::new(gateway), config));

    let port = std::env::var("CREATIONS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Creations API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
