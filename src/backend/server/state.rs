/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The SQLite connection pool
 * - The connection hub handle
 * - The loaded configuration
 *
 * All three are cheap to clone. The `FromRef` implementations let handlers
 * extract just the part they need, e.g. `State<SqlitePool>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::realtime::Hub;
use crate::backend::server::config::ServerConfig;

/// Application state shared by every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
    pub hub: Hub,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: SqlitePool, hub: Hub, config: ServerConfig) -> Self {
        Self {
            db,
            hub,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Hub {
    fn from_ref(state: &AppState) -> Self {
        state.hub.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.config)
    }
}
