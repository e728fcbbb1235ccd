//! r2d2 pools over SQLite, migrated before they are handed out.

use std::sync::atomic::{AtomicU64, Ordering};

use memoria_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;

pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const MAX_CONNECTIONS: u32 = 4;

/// Run on every new file-backed connection. WAL keeps readers going while a
/// cursor batch holds the write lock; the timeout covers that lock.
const FILE_PRAGMAS: &str = "PRAGMA journal_mode = WAL;
                            PRAGMA busy_timeout = 5000;";

/// Open (or create) the database file at `db_path`.
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager =
        SqliteConnectionManager::file(db_path).with_init(|conn| conn.execute_batch(FILE_PRAGMAS));
    build_migrated(manager, db_path)
}

/// A private in-memory database.
///
/// Every call names a fresh shared-cache database, so the pool's
/// connections see the same data but no two pools do.
pub fn init_memory_pool() -> Result<DbPool> {
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let uri = format!(
        "file:memoria_mem_{}?mode=memory&cache=shared",
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    );
    build_migrated(SqliteConnectionManager::file(&uri), &uri)
}

fn build_migrated(manager: SqliteConnectionManager, label: &str) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(MAX_CONNECTIONS)
        .build(manager)
        .map_err(|e| Error::database(format!("cannot open pool for {label}: {e}")))?;
    migrations::run_migrations(&*get_conn(&pool)?)?;
    tracing::debug!(db = label, "store pool ready");
    Ok(pool)
}

pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("no pooled connection available: {e}")))
}
