//! SQLite-backed key-value storage.
//!
//! # Invariants
//! - One row per key in `kv_entries`; writes upsert the whole value.
//! - The connection is migrated before the backend is handed out.

use super::{BackendError, StorageBackend};
use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens the database file at `path`, creating it when missing.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> Result<Vec<String>, BackendError> {
        let list_failed = |source| DbError::Entry {
            op: "list",
            key: None,
            source,
        };
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")
            .map_err(list_failed)?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(list_failed)?;
        Ok(keys)
    }
}

impl StorageBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(DbError::entry("read", key))?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.conn
            .execute(
                "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, value],
            )
            .map_err(DbError::entry("write", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteBackend;
    use crate::db::DbError;
    use crate::store::{BackendError, StorageBackend};

    #[test]
    fn upsert_replaces_value_for_same_key() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.write("doc", "{\"a\":1}").unwrap();
        backend.write("doc", "{\"a\":2}").unwrap();
        backend.write("other", "x").unwrap();

        assert_eq!(backend.read("doc").unwrap().as_deref(), Some("{\"a\":2}"));
        assert_eq!(backend.read("missing").unwrap(), None);
        assert_eq!(backend.keys().unwrap(), vec!["doc", "other"]);
    }

    #[test]
    fn failed_write_reports_operation_and_key() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.conn.execute_batch("DROP TABLE kv_entries;").unwrap();

        match backend.write("doc", "{}").unwrap_err() {
            BackendError::Db(DbError::Entry { op, key, .. }) => {
                assert_eq!(op, "write");
                assert_eq!(key.as_deref(), Some("doc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
