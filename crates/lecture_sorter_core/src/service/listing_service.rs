//! Namespace tree listing use case.
//!
//! # Responsibility
//! - Rebuild the `subject -> week -> files` hierarchy from stored keys.
//! - Attach the owner's assignment registry when one exists.
//!
//! # Invariants
//! - Only keys shaped `{owner}/{subject}/week_{week}/{file}` are listed, and
//!   never under the reserved `assignments` subject.
//! - Subjects, weeks and filenames are in ascending lexicographic order.
//! - `Clean` mode hides summaries derived from a sibling file; `Raw` keeps them.

use crate::model::assignment::Assignment;
use crate::model::namespace::{summary_file_name, OwnerId, ASSIGNMENTS_KEY, BUCKET_PREFIX};
use crate::repo::assignment_log::AssignmentLog;
use crate::service::{NotFoundTarget, ServiceError, ServiceResult};
use crate::store::ObjectStore;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Whether derived summary files appear in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingMode {
    /// Uploaded files only.
    #[default]
    Clean,
    /// Uploaded files plus their summaries.
    Raw,
}

/// `week -> filenames` for one subject.
pub type WeekMap = BTreeMap<String, Vec<String>>;

/// Listing response. Serializes as
/// `{ "<subject>": { "<week>": [files] }, "assignments": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NamespaceListing {
    #[serde(flatten)]
    pub subjects: BTreeMap<String, WeekMap>,
    /// Present when the owner's registry file exists (empty if corrupt).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<Assignment>>,
}

impl NamespaceListing {
    /// Files listed for one subject/week, if any.
    pub fn files(&self, subject: &str, week: &str) -> Option<&[String]> {
        self.subjects
            .get(subject)
            .and_then(|weeks| weeks.get(week))
            .map(Vec::as_slice)
    }
}

/// Tree listing service.
pub struct ListingService<S: ObjectStore, L: AssignmentLog> {
    store: S,
    registry: L,
}

impl<S: ObjectStore, L: AssignmentLog> ListingService<S, L> {
    pub fn new(store: S, registry: L) -> Self {
        Self { store, registry }
    }

    /// Lists one owner's namespace.
    ///
    /// # Errors
    /// - `NotFound` when the owner has no stored objects.
    pub fn get_namespace(&self, owner: &str, mode: ListingMode) -> ServiceResult<NamespaceListing> {
        let owner = OwnerId::parse(owner)?;
        let keys = self.store.list(owner.key())?;
        if keys.is_empty() {
            return Err(ServiceError::NotFound(NotFoundTarget::Namespace(
                owner.as_str().to_string(),
            )));
        }

        let mut subjects: BTreeMap<String, WeekMap> = BTreeMap::new();
        for key in &keys {
            let Some(relative) = key.relative_to(owner.key()) else {
                continue;
            };
            let [subject, bucket, file] = relative.as_slice() else {
                continue;
            };
            if *subject == ASSIGNMENTS_KEY {
                debug!("event=namespace_list module=listing status=skipped reason=reserved_subject");
                continue;
            }
            let Some(week) = bucket.strip_prefix(BUCKET_PREFIX).filter(|w| !w.is_empty()) else {
                debug!(
                    "event=namespace_list module=listing status=skipped reason=foreign_bucket"
                );
                continue;
            };
            subjects
                .entry((*subject).to_string())
                .or_default()
                .entry(week.to_string())
                .or_default()
                .push((*file).to_string());
        }

        for weeks in subjects.values_mut() {
            for files in weeks.values_mut() {
                if mode == ListingMode::Clean {
                    retain_uploaded_files(files);
                }
                files.sort();
            }
            weeks.retain(|_, files| !files.is_empty());
        }
        subjects.retain(|_, weeks| !weeks.is_empty());

        let assignments = self.registry.read_all(&owner)?;
        Ok(NamespaceListing {
            subjects,
            assignments,
        })
    }
}

fn retain_uploaded_files(files: &mut Vec<String>) {
    let derived: BTreeSet<String> = files.iter().map(|name| summary_file_name(name)).collect();
    files.retain(|name| !derived.contains(name));
}
