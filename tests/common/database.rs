//! Database test fixtures and utilities
//!
//! Every test gets its own in-memory SQLite database with the migrations
//! applied, so tests never share rows and need no cleanup.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Create a test database connection pool
///
/// An in-memory database lives as long as its connection, so the pool keeps
/// exactly one connection open for the whole test.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Run database migrations for testing
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
