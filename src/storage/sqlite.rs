//! SQLite-backed slot store.

use std::path::PathBuf;

use rusqlite::{params, Connection, OptionalExtension};

use super::KeyValueStore;
use crate::error::{Error, Result};

pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open (and initialise) the database at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        store.connect()?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.path)
            .map_err(|e| Error::Storage(format!("sqlite open: {}", e)))?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .map_err(|e| Error::Storage(format!("sqlite init: {}", e)))?;
        Ok(conn)
    }
}

impl KeyValueStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connect()?;
        conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get::<_, String>(0)
        })
        .optional()
        .map_err(|e| Error::Storage(format!("sqlite read {}: {}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, chrono::Utc::now().timestamp_millis()],
        )
        .map_err(|e| Error::Storage(format!("sqlite write {}: {}", key, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sqlite_slot_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteStore::open(temp_dir.path().join("kv.db")).unwrap();

        assert_eq!(store.get("conversations").unwrap(), None);
        store.set("conversations", "[]").unwrap();
        store.set("conversations", "[{}]").unwrap();
        assert_eq!(store.get("conversations").unwrap().as_deref(), Some("[{}]"));
    }

    #[test]
    fn test_sqlite_persists_across_handles() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kv.db");

        SqliteStore::open(&path).unwrap().set("k", "v").unwrap();
        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }
}
