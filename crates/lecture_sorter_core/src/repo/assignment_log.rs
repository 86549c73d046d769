//! Append-only assignment log persisted as one JSON array per owner.
//!
//! # Invariants
//! - `append` holds the owner's lock across read, push and rewrite, so
//!   concurrent appends for one owner never lose a record.
//! - A registry that is not a JSON array reads as an empty log; the next
//!   append replaces it with valid JSON.
//! - Individual records that do not decode are skipped; the remaining records
//!   survive the next append.
//! - Serialized shape is a pretty-printed UTF-8 array of
//!   `{subject, title, deadline}`.

use crate::model::assignment::Assignment;
use crate::model::namespace::OwnerId;
use crate::repo::owner_locks::OwnerLocks;
use crate::store::{ObjectStore, StoreError, StoreResult};
use log::warn;
use serde_json::Value;
use std::sync::Arc;

/// Single-owner append log contract.
pub trait AssignmentLog: Send + Sync {
    /// Appends one record and returns the resulting log length.
    fn append(&self, owner: &OwnerId, record: &Assignment) -> StoreResult<usize>;
    /// Reads every record in append order. `None` when no registry exists.
    fn read_all(&self, owner: &OwnerId) -> StoreResult<Option<Vec<Assignment>>>;
}

impl<T: AssignmentLog + ?Sized> AssignmentLog for Arc<T> {
    fn append(&self, owner: &OwnerId, record: &Assignment) -> StoreResult<usize> {
        (**self).append(owner, record)
    }

    fn read_all(&self, owner: &OwnerId) -> StoreResult<Option<Vec<Assignment>>> {
        (**self).read_all(owner)
    }
}

/// Assignment log stored as `{owner}/assignments.json` in an object store.
pub struct StoreAssignmentLog<S: ObjectStore> {
    store: S,
    locks: OwnerLocks,
}

impl<S: ObjectStore> StoreAssignmentLog<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: OwnerLocks::new(),
        }
    }

    fn load(&self, owner: &OwnerId) -> StoreResult<Option<Vec<Assignment>>> {
        let key = owner.registry_key()?;
        let Some(bytes) = self.store.get(&key)? else {
            return Ok(None);
        };
        let entries = match serde_json::from_slice::<Vec<Value>>(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "event=registry_read module=registry status=degraded owner={} bytes={} error={}",
                    owner.as_str(),
                    bytes.len(),
                    err
                );
                return Ok(Some(Vec::new()));
            }
        };

        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Assignment>(entry) {
                Ok(record) => records.push(record),
                Err(err) => warn!(
                    "event=registry_read module=registry status=degraded owner={} skipped_index={} error={}",
                    owner.as_str(),
                    index,
                    err
                ),
            }
        }
        Ok(Some(records))
    }
}

impl<S: ObjectStore> AssignmentLog for StoreAssignmentLog<S> {
    fn append(&self, owner: &OwnerId, record: &Assignment) -> StoreResult<usize> {
        let key = owner.registry_key()?;
        self.locks.with_owner(owner.as_str(), || {
            let mut records = self.load(owner)?.unwrap_or_default();
            records.push(record.clone());
            let encoded = serde_json::to_vec_pretty(&records)
                .map_err(|err| StoreError::Corrupt(format!("registry encode: {err}")))?;
            self.store.put(&key, &encoded)?;
            Ok(records.len())
        })
    }

    fn read_all(&self, owner: &OwnerId) -> StoreResult<Option<Vec<Assignment>>> {
        self.load(owner)
    }
}
