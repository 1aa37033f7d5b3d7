//! SQLite connection pool and migration management.

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::db::{DbError, DbResult};

/// SQLite-backed todo store.
pub struct SqliteStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteStore {
    /// Open a database at the given path, creating the file if missing.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| DbError::Storage {
                message: format!("Failed to open {}: {}", path.as_ref().display(), e),
            })?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Every SQLite connection to `:memory:` is a separate database, so the
    /// pool is pinned to a single connection that never expires.
    pub async fn in_memory() -> DbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| DbError::Storage {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })?;

        info!("Database migrations complete");
        Ok(())
    }

    /// Get a reference to the underlying pool.
    ///
    /// Useful for tests that need to reach past the store contract.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
