//! Storage configuration passed explicitly into the vault.
//!
//! # Invariants
//! - The storage root is never read from process globals.
//! - A relative SQLite file name resolves against the storage root.

use crate::store::{FsStore, ObjectStore, SqliteStore, StoreResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default object database file name for the SQLite backend.
pub const DEFAULT_DB_FILE_NAME: &str = "lecture_sorter.sqlite3";

/// Which backend holds the namespace objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// One file per object under the storage root.
    Filesystem,
    /// One row per object in an embedded SQLite database.
    Sqlite { db_file: PathBuf },
}

/// Vault construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub storage_root: PathBuf,
    pub backend: StorageBackend,
}

impl VaultConfig {
    /// Filesystem-backed configuration rooted at `storage_root`.
    ///
    /// # Errors
    /// - Returns an error when `storage_root` is blank.
    pub fn filesystem(storage_root: &str) -> Result<Self, String> {
        Ok(Self {
            storage_root: normalize_root(storage_root)?,
            backend: StorageBackend::Filesystem,
        })
    }

    /// SQLite-backed configuration storing `DEFAULT_DB_FILE_NAME` under
    /// `storage_root`.
    pub fn sqlite(storage_root: &str) -> Result<Self, String> {
        Ok(Self {
            storage_root: normalize_root(storage_root)?,
            backend: StorageBackend::Sqlite {
                db_file: PathBuf::from(DEFAULT_DB_FILE_NAME),
            },
        })
    }

    /// Resolved SQLite database path, if this config uses SQLite.
    pub fn db_path(&self) -> Option<PathBuf> {
        match &self.backend {
            StorageBackend::Filesystem => None,
            StorageBackend::Sqlite { db_file } if db_file.is_absolute() => Some(db_file.clone()),
            StorageBackend::Sqlite { db_file } => Some(self.storage_root.join(db_file)),
        }
    }

    /// Opens the configured backend, creating the root when missing.
    pub fn open_store(&self) -> StoreResult<Arc<dyn ObjectStore>> {
        match self.db_path() {
            None => Ok(Arc::new(FsStore::open(&self.storage_root)?)),
            Some(path) => Ok(Arc::new(SqliteStore::open(path)?)),
        }
    }
}

fn normalize_root(storage_root: &str) -> Result<PathBuf, String> {
    let trimmed = storage_root.trim();
    if trimmed.is_empty() {
        return Err("storage_root cannot be empty".to_string());
    }
    Ok(Path::new(trimmed).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{StorageBackend, VaultConfig, DEFAULT_DB_FILE_NAME};
    use std::path::PathBuf;

    #[test]
    fn blank_root_is_rejected() {
        let err = VaultConfig::filesystem("   ").expect_err("blank root must fail");
        assert!(err.contains("empty"));
    }

    #[test]
    fn sqlite_db_path_resolves_relative_to_root() {
        let config = VaultConfig::sqlite(" /srv/uploads ").unwrap();
        assert_eq!(
            config.db_path(),
            Some(PathBuf::from("/srv/uploads").join(DEFAULT_DB_FILE_NAME))
        );

        let absolute = VaultConfig {
            storage_root: PathBuf::from("/srv/uploads"),
            backend: StorageBackend::Sqlite {
                db_file: PathBuf::from("/var/db/objects.sqlite3"),
            },
        };
        assert_eq!(
            absolute.db_path(),
            Some(PathBuf::from("/var/db/objects.sqlite3"))
        );
    }
}
