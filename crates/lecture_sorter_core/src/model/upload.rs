//! Upload batch input and per-file ingest results.

use serde::Serialize;

/// One uploaded file: declared name plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Result record emitted for each stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestRecord {
    pub original_name: String,
    pub subject: String,
    pub week: String,
    /// Backend location of the raw file.
    pub file_location: String,
    /// Backend location of the derived summary.
    pub summary_location: String,
    pub file_key: String,
    pub summary_key: String,
    /// Summary text as persisted.
    pub summary: String,
}

/// Whole-batch ingest response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub owner: String,
    pub results: Vec<IngestRecord>,
}
