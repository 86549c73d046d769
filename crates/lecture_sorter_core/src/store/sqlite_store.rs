//! Embedded SQLite object store.
//!
//! # Invariants
//! - One row per object; `put` is an upsert.
//! - The connection is shared behind a mutex, so each call is serialized.

use super::{ObjectKey, ObjectStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Object store persisted as rows of one SQLite table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    label: String,
}

impl SqliteStore {
    /// Opens (and migrates) an object database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|err| StoreError::io(parent.display().to_string(), err))?;
        }
        let conn = open_db(&path)?;
        Ok(Self {
            conn: Mutex::new(conn),
            label: format!("sqlite:{}", path.display()),
        })
    }

    /// Opens a private in-memory object database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: Mutex::new(open_db_in_memory()?),
            label: "sqlite::memory:".to_string(),
        })
    }
}

fn parse_row_key(raw: String) -> StoreResult<ObjectKey> {
    ObjectKey::parse(&raw).map_err(|err| StoreError::Corrupt(format!("row key: {err}")))
}

impl ObjectStore for SqliteStore {
    fn put(&self, key: &ObjectKey, bytes: &[u8]) -> StoreResult<()> {
        self.conn.lock().execute(
            "INSERT INTO objects (key, bytes, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                bytes = excluded.bytes,
                updated_at = excluded.updated_at;",
            params![key.as_str(), bytes],
        )?;
        Ok(())
    }

    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Vec<u8>>> {
        let bytes = self
            .conn
            .lock()
            .query_row(
                "SELECT bytes FROM objects WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(bytes)
    }

    fn list(&self, prefix: &ObjectKey) -> StoreResult<Vec<ObjectKey>> {
        let below = format!("{}/", prefix.as_str());
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT key FROM objects
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key ASC;",
        )?;
        let rows = stmt.query_map([below.as_str()], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(parse_row_key(row?)?);
        }
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &ObjectKey) -> StoreResult<bool> {
        let changed = self
            .conn
            .lock()
            .execute("DELETE FROM objects WHERE key = ?1;", [key.as_str()])?;
        Ok(changed > 0)
    }

    fn exists(&self, key: &ObjectKey) -> StoreResult<bool> {
        let found: i64 = self.conn.lock().query_row(
            "SELECT EXISTS(SELECT 1 FROM objects WHERE key = ?1);",
            [key.as_str()],
            |row| row.get(0),
        )?;
        Ok(found == 1)
    }

    fn location(&self, key: &ObjectKey) -> String {
        format!("{}#{}", self.label, key)
    }

    fn top_level(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT substr(key, 1, instr(key, '/') - 1) AS head
             FROM objects
             WHERE instr(key, '/') > 0
             ORDER BY head ASC;",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use crate::store::{ObjectKey, ObjectStore};

    #[test]
    fn list_does_not_match_sibling_prefixes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = ObjectKey::parse("u1/Math/week_1/a.pdf").unwrap();
        let b = ObjectKey::parse("u10/Math/week_1/b.pdf").unwrap();
        store.put(&a, b"a").unwrap();
        store.put(&b, b"b").unwrap();

        let listed = store.list(&ObjectKey::parse("u1").unwrap()).unwrap();
        assert_eq!(listed, vec![a]);
        assert_eq!(store.top_level().unwrap(), vec!["u1", "u10"]);
    }

    #[test]
    fn put_upserts_and_delete_reports_existence() {
        let store = SqliteStore::open_in_memory().unwrap();
        let key = ObjectKey::parse("u1/assignments.json").unwrap();

        store.put(&key, b"[]").unwrap();
        store.put(&key, b"[1]").unwrap();
        assert_eq!(store.get(&key).unwrap().as_deref(), Some(&b"[1]"[..]));

        assert!(store.delete(&key).unwrap());
        assert!(!store.delete(&key).unwrap());
        assert!(!store.exists(&key).unwrap());
    }
}
