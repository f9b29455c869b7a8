//! rebound-api server entry point.
//!
//! Starts the Axum HTTP server over PostgreSQL, or over in-process tables
//! when `PERSISTENCE_ENABLED=false`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use rebound_api::api;
use rebound_api::app_state::AppState;
use rebound_api::config::{LogFormat, ServerConfig};
use rebound_api::persistence::Backend;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting rebound-api");

    // Build persistence layer
    let backend = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        if config.database_run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("database migrations applied");
        }
        Backend::Postgres(pool)
    } else {
        tracing::warn!("persistence disabled, records are kept in memory only");
        Backend::Memory
    };

    // Build application state and router
    tracing::info!(storage = backend.name(), "storage backend selected");
    let state = AppState::new(&backend, config.page_bounds, config.min_password_len);
    let app = api::app(state, config.request_timeout);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Backend::Postgres(pool) = backend {
        pool.close().await;
    }
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
