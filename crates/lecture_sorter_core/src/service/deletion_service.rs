//! Stored file deletion use case.
//!
//! # Invariants
//! - A missing target fails with `NotFound` and mutates nothing.
//! - The derived summary is removed best effort; its absence is not an error.

use crate::model::namespace::BucketPath;
use crate::service::{NotFoundTarget, ServiceError, ServiceResult};
use crate::store::ObjectStore;
use log::{info, warn};
use serde::Serialize;

/// Confirmation returned after a file was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionReceipt {
    pub deleted: String,
    pub subject: String,
    pub week: String,
    /// Whether a derived summary was found and removed too.
    pub summary_removed: bool,
}

impl DeletionReceipt {
    pub fn message(&self) -> String {
        format!("deleted `{}`", self.deleted)
    }
}

/// File deletion service.
pub struct DeletionService<S: ObjectStore> {
    store: S,
}

impl<S: ObjectStore> DeletionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Deletes `filename` from `owner/subject/week_{week}` with its summary.
    pub fn delete_file(
        &self,
        owner: &str,
        subject: &str,
        week: &str,
        filename: &str,
    ) -> ServiceResult<DeletionReceipt> {
        let bucket = BucketPath::resolve(owner, subject, week)?;
        let file_key = bucket.file_key(filename)?;
        let summary_key = bucket.summary_key(filename)?;
        let not_found = || {
            ServiceError::NotFound(NotFoundTarget::File {
                owner: bucket.owner().as_str().to_string(),
                subject: bucket.subject().to_string(),
                week: bucket.week().to_string(),
                filename: file_key.name().to_string(),
            })
        };

        if !self.store.exists(&file_key)? {
            return Err(not_found());
        }
        if !self.store.delete(&file_key)? {
            // Lost a race with a concurrent delete.
            return Err(not_found());
        }

        let summary_removed = match self.store.delete(&summary_key) {
            Ok(removed) => removed,
            Err(err) => {
                warn!(
                    "event=file_delete module=deletion status=degraded owner={} reason=summary_delete_failed error={}",
                    bucket.owner().as_str(),
                    err
                );
                false
            }
        };

        info!(
            "event=file_delete module=deletion status=ok owner={} subject={} week={} summary_removed={}",
            bucket.owner().as_str(),
            bucket.subject(),
            bucket.week(),
            summary_removed
        );
        Ok(DeletionReceipt {
            deleted: file_key.name().to_string(),
            subject: bucket.subject().to_string(),
            week: bucket.week().to_string(),
            summary_removed,
        })
    }
}
