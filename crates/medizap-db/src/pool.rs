//! # Database Handle
//!
//! Opens the MediZap SQLite file and hands out stores and repositories.
//!
//! ## Opening a Database
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DbConfig::new("medizap.db")  /  DbConfig::in_memory()                 │
//! │       │    .max_connections(n)   .busy_timeout(d)                      │
//! │       ▼                                                                 │
//! │  Database::new(config)                                                 │
//! │       ├── open or create the file (WAL, foreign keys on)               │
//! │       ├── SqlitePool with up to n connections                          │
//! │       └── apply pending migrations                                     │
//! │       │                                                                 │
//! │       ├── db.store()     → SqliteStore (catalog + cart services)       │
//! │       ├── db.medicines() → MedicineRepository (seeding, counts)        │
//! │       └── db.cart()      → CartRepository                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every store transaction takes the write lock on `BEGIN`, so writers on
//! different connections queue for at most `busy_timeout` before failing.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::cart::CartRepository;
use crate::repository::medicine::MedicineRepository;
use crate::store::SqliteStore;

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how many writers may wait on it.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/medizap.db")
///     .max_connections(4)
///     .busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file (created if missing).
    pub database_path: PathBuf,

    /// Pool size. Default: 5
    pub max_connections: u32,

    /// How long a transaction waits for another connection's write lock.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    in_memory: bool,
}

impl DbConfig {
    /// Configuration for a database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            in_memory: false,
        }
    }

    /// A private in-memory database, used by tests.
    ///
    /// Each SQLite connection to `:memory:` sees its own empty database,
    /// so the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            busy_timeout: Duration::from_secs(5),
            in_memory: true,
        }
    }

    /// Sets the pool size. Ignored for in-memory databases.
    pub fn max_connections(mut self, max: u32) -> Self {
        if !self.in_memory {
            self.max_connections = max;
        }
        self
    }

    /// Sets how long a transaction waits for the write lock.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = if self.in_memory {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        options
            .synchronous(SqliteSynchronous::Normal)
            // Off by default in SQLite
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
    }
}

// =============================================================================
// Database
// =============================================================================

/// An open, migrated MediZap database.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./medizap.db")).await?;
///
/// let store = Arc::new(db.store());
/// let catalog = MedicineCatalog::from_shared(Arc::clone(&store));
/// let cart = CartAggregator::from_shared(store);
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and applies pending migrations.
    ///
    /// ## Errors
    /// * `DbError::ConnectionFailed` - the file cannot be opened or created
    /// * `DbError::MigrationFailed` - the schema could not be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening database"
        );

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if config.in_memory {
            // The data lives and dies with the only connection
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(busy_timeout = ?config.busy_timeout, "Database pool created");

        migrations::run_migrations(&pool).await?;

        Ok(Database { pool })
    }

    /// Returns a transactional store for the catalog and cart services.
    pub fn store(&self) -> SqliteStore {
        SqliteStore::new(self.pool.clone())
    }

    /// Returns the medicine repository.
    pub fn medicines(&self) -> MedicineRepository {
        MedicineRepository::new(self.pool.clone())
    }

    /// Returns the cart repository.
    pub fn cart(&self) -> CartRepository {
        CartRepository::new(self.pool.clone())
    }

    /// Closes every pooled connection. Stores and repositories handed out
    /// earlier fail from here on.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (total, applied) = migrations::migration_status(&db.pool).await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);

        assert_eq!(db.medicines().count().await.unwrap(), 0);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/medizap-test.db")
            .max_connections(10)
            .busy_timeout(Duration::from_secs(1));

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_in_memory_stays_single_connection() {
        let config = DbConfig::in_memory().max_connections(8);
        assert_eq!(config.max_connections, 1);
    }
}
