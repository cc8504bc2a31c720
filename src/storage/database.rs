//! Pooled SQLite handle.

use std::fmt;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::DatabaseConfig;
use crate::storage::error::StorageResult;
use crate::storage::schema;

const MEMORY_PATH: &str = ":memory:";

/// A connection checked out for the duration of one request.
pub type Connection = PooledConnection<SqliteConnectionManager>;

/// Shared handle to the employee store. Cloning shares the pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    is_memory: bool,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("is_memory", &self.is_memory)
            .field("state", &self.pool.state())
            .finish()
    }
}

impl Database {
    /// In-memory store with default settings.
    pub fn in_memory() -> StorageResult<Self> {
        Self::open(&DatabaseConfig::default())
    }

    /// Open the store described by `config`. Does not create the schema.
    pub fn open(config: &DatabaseConfig) -> StorageResult<Self> {
        let is_memory = config.path == MEMORY_PATH;
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);

        let manager = if is_memory {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(&config.path)
        }
        .with_init(move |conn| conn.busy_timeout(busy_timeout));

        let mut builder = Pool::builder()
            .connection_timeout(Duration::from_millis(config.connection_timeout_ms));
        builder = if is_memory {
            // Every in-memory connection is its own database, so keep exactly one alive.
            builder
                .max_size(1)
                .min_idle(Some(1))
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            builder.max_size(config.max_connections)
        };

        let pool = builder.build(manager)?;
        tracing::info!(
            path = %config.path,
            max_connections = pool.max_size(),
            "Employee store opened"
        );

        Ok(Self { pool, is_memory })
    }

    /// Create the employee table if it does not exist.
    pub fn init_schema(&self) -> StorageResult<()> {
        let conn = self.connection()?;
        schema::initialize_schema(&conn)
    }

    /// Check out a connection.
    pub fn connection(&self) -> StorageResult<Connection> {
        Ok(self.pool.get()?)
    }

    pub fn is_memory(&self) -> bool {
        self.is_memory
    }
}
