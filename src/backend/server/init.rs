/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server.
 *
 * # Initialization Process
 *
 * 1. Connect to SQLite (the database file is created if missing)
 * 2. Apply migrations from `migrations/`
 * 3. Start the connection hub
 * 4. Build the router around the application state
 *
 * Unlike optional services, the database is required: startup fails without it.
 */

use std::str::FromStr;
use std::time::Duration;

use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::backend::realtime::Hub;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{DatabaseConfig, ServerConfig};
use crate::backend::server::state::AppState;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Open the pool and bring the schema up to date
pub async fn connect_database(config: &DatabaseConfig) -> Result<SqlitePool, InitError> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        // Concurrent senders wait on the write lock instead of failing
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database ready at {}", config.url);

    Ok(pool)
}

/// Build the application around an existing pool
///
/// Starts the hub, so this must run inside a Tokio runtime.
pub fn build_app(pool: SqlitePool, config: ServerConfig) -> (Router<()>, AppState) {
    let hub = Hub::start(config.hub);
    let state = AppState::new(pool, hub, config);
    (create_router(state.clone()), state)
}

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, InitError> {
    tracing::info!("Initializing TapSpot messaging server");

    let pool = connect_database(&config.database).await?;
    let (app, _) = build_app(pool, config);

    tracing::info!("Router configured");
    Ok(app)
}
