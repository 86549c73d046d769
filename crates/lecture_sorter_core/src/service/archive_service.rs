//! Namespace archive export use case.
//!
//! # Responsibility
//! - Snapshot the key set of one owner namespace.
//! - Stream those objects as a gzip-compressed tar into any writer.
//!
//! # Invariants
//! - Entry names are paths relative to the owner root (`Math/week_3/a.pdf`,
//!   `assignments.json`).
//! - Objects are read one at a time; only the current entry and the
//!   compressor state are buffered.
//! - Export takes no lock. Objects deleted after the snapshot are skipped,
//!   objects added after it are not included.

use crate::model::namespace::OwnerId;
use crate::service::{NotFoundTarget, ServiceError, ServiceResult};
use crate::store::{ObjectKey, ObjectStore};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, error, info};
use std::io::Write;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tar::{Builder, EntryType, Header};

const ARCHIVE_EXTENSION: &str = ".tar.gz";
const ENTRY_MODE: u32 = 0o644;

/// Counters reported once an archive was fully written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportStats {
    pub entries: usize,
    /// Snapshot keys that vanished before they could be read.
    pub skipped: usize,
    pub bytes_in: u64,
}

/// Prepared export of one namespace. Nothing is read until [`Self::write_to`].
pub struct ArchiveExport<S: ObjectStore> {
    store: S,
    owner: OwnerId,
    keys: Vec<ObjectKey>,
}

impl<S: ObjectStore> ArchiveExport<S> {
    pub fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Entry names the archive will contain, in write order.
    pub fn entry_names(&self) -> Vec<String> {
        self.keys
            .iter()
            .filter_map(|key| key.relative_to(self.owner.key()).map(|rel| rel.join("/")))
            .collect()
    }

    /// Suggested download filename, `<owner>.tar.gz`.
    pub fn suggested_filename(&self) -> String {
        format!("{}{ARCHIVE_EXTENSION}", self.owner.as_str())
    }

    /// `Content-Disposition` value with an ASCII fallback and an RFC 5987
    /// UTF-8 `filename*` parameter.
    pub fn content_disposition(&self) -> String {
        content_disposition(&self.suggested_filename())
    }

    /// Streams the archive into `sink`.
    ///
    /// # Errors
    /// - `Storage` when an object read fails.
    /// - `ArchiveStream` when `sink` rejects a write.
    pub fn write_to<W: Write>(self, sink: W) -> ServiceResult<ExportStats> {
        let started_at = Instant::now();
        let result = self.stream(sink);
        match &result {
            Ok(stats) => info!(
                "event=archive_export module=archive status=ok owner={} entries={} skipped={} bytes_in={} duration_ms={}",
                self.owner.as_str(),
                stats.entries,
                stats.skipped,
                stats.bytes_in,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=archive_export module=archive status=error owner={} duration_ms={} error={}",
                self.owner.as_str(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn stream<W: Write>(&self, sink: W) -> ServiceResult<ExportStats> {
        let mtime = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        let mut builder = Builder::new(GzEncoder::new(sink, Compression::default()));
        let mut stats = ExportStats::default();

        for key in &self.keys {
            let Some(relative) = key.relative_to(self.owner.key()) else {
                continue;
            };
            let Some(bytes) = self.store.get(key)? else {
                debug!("event=archive_export module=archive status=skipped reason=vanished");
                stats.skipped += 1;
                continue;
            };

            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Regular);
            header.set_size(bytes.len() as u64);
            header.set_mode(ENTRY_MODE);
            header.set_mtime(mtime);
            builder
                .append_data(&mut header, relative.join("/"), bytes.as_slice())
                .map_err(ServiceError::ArchiveStream)?;

            stats.entries += 1;
            stats.bytes_in += bytes.len() as u64;
        }

        let encoder = builder.into_inner().map_err(ServiceError::ArchiveStream)?;
        let mut sink = encoder.finish().map_err(ServiceError::ArchiveStream)?;
        sink.flush().map_err(ServiceError::ArchiveStream)?;
        Ok(stats)
    }
}

/// Archive export service.
pub struct ArchiveService<S: ObjectStore + Clone> {
    store: S,
}

impl<S: ObjectStore + Clone> ArchiveService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Snapshots `owner`'s key set for export.
    ///
    /// # Errors
    /// - `NotFound` when the owner has no stored objects.
    pub fn prepare(&self, owner: &str) -> ServiceResult<ArchiveExport<S>> {
        let owner = OwnerId::parse(owner)?;
        let keys = self.store.list(owner.key())?;
        if keys.is_empty() {
            return Err(ServiceError::NotFound(NotFoundTarget::Namespace(
                owner.as_str().to_string(),
            )));
        }
        Ok(ArchiveExport {
            store: self.store.clone(),
            owner,
            keys,
        })
    }
}

/// Renders `attachment; filename="..."; filename*=UTF-8''...` for `filename`.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|ch| {
            if (ch.is_ascii_graphic() && ch != '"' && ch != '\\') || ch == ' ' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

#[cfg(test)]
mod tests {
    use super::content_disposition;

    #[test]
    fn content_disposition_encodes_non_ascii_names() {
        let header = content_disposition("강의.tar.gz");
        assert_eq!(
            header,
            "attachment; filename=\"__.tar.gz\"; filename*=UTF-8''%EA%B0%95%EC%9D%98.tar.gz"
        );
    }

    #[test]
    fn content_disposition_escapes_quotes_in_fallback() {
        let header = content_disposition("a\"b.tar.gz");
        assert!(header.starts_with("attachment; filename=\"a_b.tar.gz\""));
        assert!(header.ends_with("a%22b.tar.gz"));
    }
}
