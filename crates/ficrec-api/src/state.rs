//! Application state
//!
//! The state holds the configuration and the connection pool and is handed to
//! every handler explicitly through axum's `State` extractor. There is no
//! process-wide database handle.

use crate::schema;
use ficrec_core::AppConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, read-only after startup
    pub config: AppConfig,
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Connect to the configured database, initialize the schema, and build
    /// the state.
    pub async fn new(config: AppConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.database.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let db = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_with(options)
            .await?;

        schema::init(&db).await?;

        Ok(Self { config, db })
    }

    /// Build state from an existing pool. The schema is assumed to exist.
    pub fn from_pool(config: AppConfig, db: SqlitePool) -> Self {
        Self { config, db }
    }
}
