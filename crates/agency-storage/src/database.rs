//! Database connection and blob operations

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::Result;

/// Shared handle to the blob store.
///
/// Clones share one connection. There is no cross-process locking: two
/// processes writing the same file race and the last writer wins.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;

        // WAL mode so a reader in another process does not block on our writes
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        tracing::debug!(path = %path.as_ref().display(), "Opened database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Raw blob text for `key`, or `None` if it was never written.
    pub fn get_blob(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| read_blob(conn, key))
    }

    pub fn has_blob(&self, key: &str) -> Result<bool> {
        self.with_connection(|conn| {
            let found: Option<i32> = conn
                .query_row("SELECT 1 FROM blobs WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn set_blob(&self, key: &str, value: &str) -> Result<()> {
        self.with_connection(|conn| write_blob(conn, key, value))
    }

    /// Write `value` only if `key` has never been written. Returns whether
    /// the write happened.
    pub fn set_blob_if_absent(&self, key: &str, value: &str) -> Result<bool> {
        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, updated_at],
            )?;
            Ok(inserted > 0)
        })
    }

    pub fn remove_blob(&self, key: &str) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM blobs WHERE key = ?1", [key])?;
            Ok(())
        })
    }

    /// Read-modify-write of a single blob inside one transaction.
    ///
    /// `f` receives the current text (if any) and returns the replacement,
    /// or `None` to leave the blob untouched. If `f` fails nothing is
    /// written. Returns whether a write happened.
    pub fn update_blob<F, E>(&self, key: &str, f: F) -> std::result::Result<bool, E>
    where
        F: FnOnce(Option<&str>) -> std::result::Result<Option<String>, E>,
        E: From<StorageError>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(StorageError::from)?;

        let current = read_blob(&tx, key)?;
        let written = match f(current.as_deref())? {
            Some(next) => {
                write_blob(&tx, key, &next)?;
                true
            }
            None => false,
        };

        tx.commit().map_err(StorageError::from)?;
        Ok(written)
    }
}

fn read_blob(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM blobs WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

fn write_blob(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR REPLACE INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![key, value, updated_at],
    )?;
    Ok(())
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            let count: i32 = conn.query_row("SELECT COUNT(*) FROM blobs", [], |row| row.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_blob_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_blob("k").unwrap(), None);
        assert!(!db.has_blob("k").unwrap());

        db.set_blob("k", "[1]").unwrap();
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("[1]"));
        assert!(db.has_blob("k").unwrap());

        db.set_blob("k", "[2]").unwrap();
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("[2]"));

        db.remove_blob("k").unwrap();
        assert!(!db.has_blob("k").unwrap());
    }

    #[test]
    fn test_set_if_absent_never_overwrites() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.set_blob_if_absent("k", "first").unwrap());
        assert!(!db.set_blob_if_absent("k", "second").unwrap());
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn test_update_blob_sees_current_value() {
        let db = Database::open_in_memory().unwrap();
        db.update_blob::<_, StorageError>("k", |current| {
            assert_eq!(current, None);
            Ok(Some("a".to_string()))
        })
        .unwrap();
        db.update_blob::<_, StorageError>("k", |current| {
            Ok(Some(format!("{}b", current.unwrap_or_default())))
        })
        .unwrap();
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("ab"));
    }

    #[test]
    fn test_update_blob_can_skip_write() {
        let db = Database::open_in_memory().unwrap();
        let written = db
            .update_blob::<_, StorageError>("k", |_| Ok(None))
            .unwrap();
        assert!(!written);
        assert!(!db.has_blob("k").unwrap());
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let db = Database::open_in_memory().unwrap();
        db.set_blob("k", "kept").unwrap();

        let result = db.update_blob("k", |_| {
            Err(StorageError::Migration {
                version: 0,
                reason: "boom".to_string(),
            })
        });
        assert!(result.is_err());
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_blobs_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agency.db");

        {
            let db = Database::open(&path).unwrap();
            db.set_blob("k", "persisted").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("persisted"));
    }
}
