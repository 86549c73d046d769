//! Upload ingestion use case.
//!
//! # Responsibility
//! - Store each uploaded file in its week bucket with a derived summary.
//! - Emit one result record per stored file.
//!
//! # Invariants
//! - Blank identifiers, unsafe names and empty batches fail before any write.
//! - Summaries are computed before the raw write and never fail the batch.
//! - Re-uploading a filename overwrites the stored file and its summary.
//!
//! # Partial batches
//! Items are written in order. A storage fault on item `n` aborts the batch
//! with `ServiceError::Storage`; items `0..n` remain stored and are not rolled
//! back.

use crate::model::namespace::BucketPath;
use crate::model::upload::{IngestRecord, IngestReport, UploadFile};
use crate::model::validation::ValidationError;
use crate::service::ServiceResult;
use crate::store::{ObjectKey, ObjectStore};
use crate::summary::{LopdfPageExtractor, PageExtractor, SummaryExtractor};
use log::{error, info};
use std::time::Instant;

/// Batch ingestion service.
pub struct IngestService<S: ObjectStore, E: PageExtractor = LopdfPageExtractor> {
    store: S,
    summaries: SummaryExtractor<E>,
}

struct PlannedFile<'a> {
    name: String,
    bytes: &'a [u8],
    file_key: ObjectKey,
    summary_key: ObjectKey,
}

impl<S: ObjectStore> IngestService<S> {
    /// Creates a service with the default PDF extractor.
    pub fn new(store: S) -> Self {
        Self::with_extractor(store, SummaryExtractor::default())
    }
}

impl<S: ObjectStore, E: PageExtractor> IngestService<S, E> {
    /// Creates a service with a caller-provided summary extractor.
    pub fn with_extractor(store: S, summaries: SummaryExtractor<E>) -> Self {
        Self { store, summaries }
    }

    /// Stores `files` under `owner/subject/week_{week}`.
    ///
    /// # Errors
    /// - `Validation` for blank or unsafe identifiers/filenames and empty batches.
    /// - `Storage` when a write fails; earlier items stay stored.
    pub fn ingest(
        &self,
        owner: &str,
        subject: &str,
        week: &str,
        files: &[UploadFile],
    ) -> ServiceResult<IngestReport> {
        let bucket = BucketPath::resolve(owner, subject, week)?;
        if files.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }
        let planned = plan_batch(&bucket, files)?;

        let started_at = Instant::now();
        info!(
            "event=ingest module=ingest status=start owner={} subject={} week={} files={}",
            bucket.owner().as_str(),
            bucket.subject(),
            bucket.week(),
            planned.len()
        );

        let mut results = Vec::with_capacity(planned.len());
        for (index, item) in planned.iter().enumerate() {
            match self.store_one(&bucket, item) {
                Ok(record) => results.push(record),
                Err(err) => {
                    error!(
                        "event=ingest module=ingest status=error owner={} stored={} failed_index={} duration_ms={} error={}",
                        bucket.owner().as_str(),
                        results.len(),
                        index,
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return Err(err.into());
                }
            }
        }

        info!(
            "event=ingest module=ingest status=ok owner={} stored={} duration_ms={}",
            bucket.owner().as_str(),
            results.len(),
            started_at.elapsed().as_millis()
        );
        Ok(IngestReport {
            owner: bucket.owner().as_str().to_string(),
            results,
        })
    }

    fn store_one(
        &self,
        bucket: &BucketPath,
        item: &PlannedFile<'_>,
    ) -> crate::store::StoreResult<IngestRecord> {
        let summary = self.summaries.summarize(&item.name, item.bytes);
        self.store.put(&item.file_key, item.bytes)?;
        self.store.put(&item.summary_key, summary.as_bytes())?;

        Ok(IngestRecord {
            original_name: item.name.clone(),
            subject: bucket.subject().to_string(),
            week: bucket.week().to_string(),
            file_location: self.store.location(&item.file_key),
            summary_location: self.store.location(&item.summary_key),
            file_key: item.file_key.to_string(),
            summary_key: item.summary_key.to_string(),
            summary,
        })
    }
}

fn plan_batch<'a>(
    bucket: &BucketPath,
    files: &'a [UploadFile],
) -> Result<Vec<PlannedFile<'a>>, ValidationError> {
    files
        .iter()
        .map(|file| {
            let file_key = bucket.file_key(&file.name)?;
            let summary_key = bucket.summary_key(&file.name)?;
            Ok(PlannedFile {
                name: file_key.name().to_string(),
                bytes: file.bytes.as_slice(),
                file_key,
                summary_key,
            })
        })
        .collect()
}
