//! Vault facade: one object store wired into every use-case service.
//!
//! # Responsibility
//! - Expose the core operations (ingest, register, list, delete, export).
//! - Share one assignment log so per-owner registry locking is process-wide
//!   for this vault.
//!
//! # Invariants
//! - All services of one vault see the same backend.

use crate::config::VaultConfig;
use crate::model::assignment::Assignment;
use crate::model::upload::{IngestReport, UploadFile};
use crate::repo::assignment_log::StoreAssignmentLog;
use crate::service::archive_service::{ArchiveExport, ArchiveService};
use crate::service::assignment_service::{AssignmentService, RegistrationReceipt};
use crate::service::deletion_service::{DeletionReceipt, DeletionService};
use crate::service::ingest_service::IngestService;
use crate::service::listing_service::{ListingMode, ListingService, NamespaceListing};
use crate::service::ServiceResult;
use crate::store::{ObjectStore, StoreResult};
use chrono::NaiveDate;
use std::sync::Arc;

/// Backend handle shared by all services.
pub type SharedStore = Arc<dyn ObjectStore>;
type SharedLog = Arc<StoreAssignmentLog<SharedStore>>;

/// Lecture-material vault over one storage backend.
pub struct Vault {
    store: SharedStore,
    ingest: IngestService<SharedStore>,
    listing: ListingService<SharedStore, SharedLog>,
    deletion: DeletionService<SharedStore>,
    archive: ArchiveService<SharedStore>,
    assignments: AssignmentService<SharedLog>,
}

impl Vault {
    /// Opens the backend described by `config`.
    pub fn open(config: &VaultConfig) -> StoreResult<Self> {
        Ok(Self::with_store(config.open_store()?))
    }

    /// Builds a vault over an already-open backend.
    pub fn with_store(store: SharedStore) -> Self {
        let log: SharedLog = Arc::new(StoreAssignmentLog::new(Arc::clone(&store)));
        Self {
            ingest: IngestService::new(Arc::clone(&store)),
            listing: ListingService::new(Arc::clone(&store), Arc::clone(&log)),
            deletion: DeletionService::new(Arc::clone(&store)),
            archive: ArchiveService::new(Arc::clone(&store)),
            assignments: AssignmentService::new(log),
            store,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Stores an upload batch. See [`IngestService::ingest`] for partial-batch
    /// behavior.
    pub fn ingest(
        &self,
        owner: &str,
        subject: &str,
        week: &str,
        files: &[UploadFile],
    ) -> ServiceResult<IngestReport> {
        self.ingest.ingest(owner, subject, week, files)
    }

    pub fn register_assignment(
        &self,
        owner: &str,
        subject: &str,
        title: &str,
        deadline: &str,
    ) -> ServiceResult<RegistrationReceipt> {
        self.assignments.register(owner, subject, title, deadline)
    }

    pub fn get_namespace(&self, owner: &str, mode: ListingMode) -> ServiceResult<NamespaceListing> {
        self.listing.get_namespace(owner, mode)
    }

    pub fn delete_file(
        &self,
        owner: &str,
        subject: &str,
        week: &str,
        filename: &str,
    ) -> ServiceResult<DeletionReceipt> {
        self.deletion.delete_file(owner, subject, week, filename)
    }

    pub fn export_archive(&self, owner: &str) -> ServiceResult<ArchiveExport<SharedStore>> {
        self.archive.prepare(owner)
    }

    pub fn assignments(&self, owner: &str) -> ServiceResult<Vec<Assignment>> {
        self.assignments.list(owner)
    }

    pub fn due_on(&self, owner: &str, date: NaiveDate) -> ServiceResult<Vec<Assignment>> {
        self.assignments.due_on(owner, date)
    }

    pub fn due_tomorrow(&self, owner: &str, today: NaiveDate) -> ServiceResult<Vec<Assignment>> {
        self.assignments.due_tomorrow(owner, today)
    }

    /// Owner namespaces currently holding at least one object.
    pub fn owners(&self) -> ServiceResult<Vec<String>> {
        Ok(self.store.top_level()?)
    }
}
