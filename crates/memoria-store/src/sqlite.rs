//! SQLite implementation of [`DocumentStore`].
//!
//! Every call checks a connection out of the pool and runs on tokio's
//! blocking pool, since rusqlite is synchronous. Partial updates are done
//! in SQL with `json_set`, so an increment never round-trips through Rust.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

use memoria_core::{Error, Result};

use crate::paths::split_document;
use crate::pool::{self, DbPool};
use crate::store::{DocumentStore, FieldOp, FieldWrite, StoredDocument};

/// Document store over an r2d2 SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// A store over a fresh, private in-memory database.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(pool::init_memory_pool()?))
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool::get_conn(&pool)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| Error::Internal(format!("store task failed: {e}")))?
    }
}

/// `activeFolder.activeFolderItemIdx` -> `$.activeFolder.activeFolderItemIdx`
fn json_path(field: &str) -> Result<String> {
    if field.is_empty() || field.split('.').any(str::is_empty) {
        return Err(Error::Validation(format!("invalid field path '{field}'")));
    }
    Ok(format!("$.{field}"))
}

fn get_document(conn: &Connection, path: &str) -> Result<Option<Value>> {
    let data: Option<String> = conn
        .query_row("SELECT data FROM documents WHERE path = ?1", [path], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|e| Error::database(e.to_string()))?;
    data.map(|d| serde_json::from_str(&d).map_err(|e| Error::database(e.to_string())))
        .transpose()
}

fn list_collection(conn: &Connection, collection: &str) -> Result<Vec<StoredDocument>> {
    let mut stmt = conn
        .prepare("SELECT doc_id, data FROM documents WHERE collection = ?1 ORDER BY rowid ASC")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    rows.into_iter()
        .map(|(id, data)| {
            let data = serde_json::from_str(&data).map_err(|e| Error::database(e.to_string()))?;
            Ok(StoredDocument { id, data })
        })
        .collect()
}

fn apply_writes(conn: &mut Connection, writes: &[FieldWrite]) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let tx = conn
        .transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    for write in writes {
        let path = json_path(&write.field)?;
        let n = match write.op {
            FieldOp::Set(value) => tx.execute(
                "UPDATE documents SET data = json_set(data, ?2, ?3), updated_at = ?4
                 WHERE path = ?1",
                rusqlite::params![write.path, path, value, now],
            ),
            FieldOp::Increment(delta) => tx.execute(
                "UPDATE documents
                 SET data = json_set(data, ?2, COALESCE(json_extract(data, ?2), 0) + ?3),
                     updated_at = ?4
                 WHERE path = ?1",
                rusqlite::params![write.path, path, delta, now],
            ),
        }
        .map_err(|e| Error::database(e.to_string()))?;

        if n == 0 {
            // Dropping `tx` rolls back any earlier writes in this batch.
            let (collection, _) = split_document(&write.path)?;
            let entity = collection.rsplit('/').next().unwrap_or(collection);
            return Err(Error::not_found(entity.trim_end_matches('s'), &write.path));
        }
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))
}

fn put_document(conn: &Connection, path: &str, data: &Value) -> Result<()> {
    let (collection, doc_id) = split_document(path)?;
    if !data.is_object() {
        return Err(Error::Validation(format!(
            "document {path} must be a JSON object"
        )));
    }
    conn.execute(
        "INSERT INTO documents (path, collection, doc_id, data, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(path) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
        rusqlite::params![path, collection, doc_id, data.to_string(), Utc::now().to_rfc3339()],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let path = path.to_string();
        self.with_conn(move |conn| get_document(conn, &path)).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let collection = collection.to_string();
        self.with_conn(move |conn| list_collection(conn, &collection))
            .await
    }

    async fn apply(&self, writes: Vec<FieldWrite>) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }
        self.with_conn(move |conn| apply_writes(conn, &writes)).await
    }

    async fn put(&self, path: &str, data: Value) -> Result<()> {
        let path = path.to_string();
        self.with_conn(move |conn| put_document(conn, &path, &data))
            .await
    }
}
