//! SQLite-backed rate counter store using `SeaORM`.
//!
//! Counters live in a single `purge_state` key/value table. Each counter
//! occupies two rows: the count and the RFC 3339 start of its window.

pub(crate) mod entity;
mod migration;
mod state_store;

use std::path::Path;
use std::time::Duration;

use edgepurge_core::error::{CoreError, CoreResult};
use sea_orm::sqlx::sqlite::SqliteJournalMode;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::sync::Mutex;

use migration::Migrator;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// `StateStore` persisted in a local `SQLite` database file.
///
/// Several stores (in this or other processes) may share one file. The
/// database runs in WAL mode and writers wait up to [`BUSY_TIMEOUT`] for
/// each other.
pub struct SqliteStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
    /// Serializes read-modify-write increments issued through this store.
    pub(crate) write_lock: Mutex<()>,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path` and bring its schema up to date.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn new(db_path: &Path) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let mut options = ConnectOptions::new(db_url);
        options
            .map_sqlx_sqlite_opts(|opts| {
                opts.journal_mode(SqliteJournalMode::Wal)
                    .busy_timeout(BUSY_TIMEOUT)
            })
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))?;

        log::debug!("[state] Opened SQLite state store at {}", db_path.display());
        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }
}
