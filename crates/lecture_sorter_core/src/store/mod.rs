//! Hierarchical key-value storage contract and backends.
//!
//! # Responsibility
//! - Define the `put/get/list/delete` contract every use case persists through.
//! - Keep filesystem and SQLite details inside their backend modules.
//!
//! # Invariants
//! - `put` replaces the whole object (last writer wins).
//! - `list` is recursive and returns keys in ascending order.
//! - An owner namespace exists exactly when at least one object lives below it.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod fs_store;
pub mod key;
mod sqlite_store;

pub use fs_store::FsStore;
pub use key::{InvalidKey, ObjectKey};
pub use sqlite_store::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by storage backends.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem read/write failure.
    Io {
        key: String,
        source: std::io::Error,
    },
    /// Embedded database failure.
    Db(DbError),
    /// Key rejected by segment validation.
    InvalidKey(InvalidKey),
    /// Backend holds data that cannot be mapped back to a valid key.
    Corrupt(String),
}

impl StoreError {
    pub(crate) fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { key, source } => write!(f, "storage i/o failed for `{key}`: {source}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(err) => write!(f, "{err}"),
            Self::Corrupt(message) => write!(f, "corrupt storage entry: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::InvalidKey(err) => Some(err),
            Self::Corrupt(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<InvalidKey> for StoreError {
    fn from(value: InvalidKey) -> Self {
        Self::InvalidKey(value)
    }
}

/// Hierarchical object storage used by every use-case service.
pub trait ObjectStore: Send + Sync {
    /// Writes `bytes` under `key`, creating intermediate levels and replacing
    /// any existing object.
    fn put(&self, key: &ObjectKey, bytes: &[u8]) -> StoreResult<()>;
    /// Reads one object. Returns `None` when absent.
    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Vec<u8>>>;
    /// Lists all object keys strictly below `prefix`, sorted ascending.
    fn list(&self, prefix: &ObjectKey) -> StoreResult<Vec<ObjectKey>>;
    /// Removes one object. Returns whether it existed.
    fn delete(&self, key: &ObjectKey) -> StoreResult<bool>;
    /// Whether an object exists under exactly `key`.
    fn exists(&self, key: &ObjectKey) -> StoreResult<bool>;
    /// Human-addressable location of `key` in this backend.
    fn location(&self, key: &ObjectKey) -> String;
    /// Lists distinct first-level segments that hold at least one object.
    fn top_level(&self) -> StoreResult<Vec<String>>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    fn put(&self, key: &ObjectKey, bytes: &[u8]) -> StoreResult<()> {
        (**self).put(key, bytes)
    }

    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn list(&self, prefix: &ObjectKey) -> StoreResult<Vec<ObjectKey>> {
        (**self).list(prefix)
    }

    fn delete(&self, key: &ObjectKey) -> StoreResult<bool> {
        (**self).delete(key)
    }

    fn exists(&self, key: &ObjectKey) -> StoreResult<bool> {
        (**self).exists(key)
    }

    fn location(&self, key: &ObjectKey) -> String {
        (**self).location(key)
    }

    fn top_level(&self) -> StoreResult<Vec<String>> {
        (**self).top_level()
    }
}
