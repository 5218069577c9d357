//! PostgreSQL persistence for the millionaire catalogue.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod migrations;
pub mod models;
pub mod repositories;
pub mod store;

pub use migrations::{migrate_down, migrate_up, MigrationDirection};
pub use store::MillionaireStore;

pub type DbPool = sqlx::PgPool;

/// Bounds for the connection pool.
///
/// Callers queue on `acquire` once `max_connections` are checked out;
/// they fail only after `acquire_timeout`.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 5,
            max_lifetime: Duration::from_secs(300),
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// Create a connection pool and verify that it can reach the server.
pub async fn create_pool(
    connect_options: PgConnectOptions,
    settings: &PoolSettings,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .max_lifetime(settings.max_lifetime)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(connect_options)
        .await
}

/// Round-trip a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
