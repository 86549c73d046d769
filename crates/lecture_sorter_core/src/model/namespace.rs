//! Namespace path resolution.
//!
//! # Responsibility
//! - Turn raw `(owner, subject, week)` input into deterministic storage keys.
//! - Derive summary object names from uploaded filenames.
//!
//! # Invariants
//! - Components are trimmed; blank components are rejected.
//! - Components containing `..`, `/`, `\` or control characters are rejected.
//! - The same input triple always resolves to the same key.
//!
//! Layout: `{owner}/{subject}/week_{week}/{filename}` plus
//! `{owner}/assignments.json`.

use crate::model::validation::{require_field, ValidationError};
use crate::store::{InvalidKey, ObjectKey};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Fixed prefix of every week bucket name.
pub const BUCKET_PREFIX: &str = "week_";
/// File name of the per-owner assignment registry.
pub const REGISTRY_FILE_NAME: &str = "assignments.json";
/// Listing key holding the registry; no subject may take this name.
pub const ASSIGNMENTS_KEY: &str = "assignments";
/// Suffix appended to a file stem to name its derived summary.
pub const SUMMARY_SUFFIX: &str = "_summary.txt";

static UNSAFE_COMPONENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[/\\\x00-\x1f\x7f]|\.\.").expect("valid unsafe component regex")
});

fn safe_component(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let value = require_field(field, raw)?;
    if value == "." || UNSAFE_COMPONENT_RE.is_match(&value) {
        return Err(ValidationError::UnsafeComponent { field, value });
    }
    Ok(value)
}

fn to_key<I, S>(field: &'static str, segments: I) -> Result<ObjectKey, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ObjectKey::from_segments(segments).map_err(|err| ValidationError::UnsafeComponent {
        field,
        value: err.segment,
    })
}

/// Validated owner namespace identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId {
    id: String,
    key: ObjectKey,
}

impl OwnerId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let id = safe_component("owner", raw)?;
        let key = to_key("owner", [id.as_str()])?;
        Ok(Self { id, key })
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Root key of the owner's namespace.
    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    /// Key of the owner's assignment registry file.
    pub fn registry_key(&self) -> Result<ObjectKey, InvalidKey> {
        self.key.child(REGISTRY_FILE_NAME)
    }
}

/// Resolved location of one week bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketPath {
    owner: OwnerId,
    subject: String,
    week: String,
    key: ObjectKey,
}

impl BucketPath {
    /// Resolves raw caller input into a bucket location.
    pub fn resolve(owner: &str, subject: &str, week: &str) -> Result<Self, ValidationError> {
        let owner = OwnerId::parse(owner)?;
        let subject = safe_component("subject", subject)?;
        if subject == REGISTRY_FILE_NAME || subject == ASSIGNMENTS_KEY {
            return Err(ValidationError::ReservedName {
                field: "subject",
                value: subject,
            });
        }
        let week = safe_component("week", week)?;
        let key = to_key(
            "week",
            [
                owner.as_str(),
                subject.as_str(),
                format!("{BUCKET_PREFIX}{week}").as_str(),
            ],
        )?;
        Ok(Self {
            owner,
            subject,
            week,
            key,
        })
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn week(&self) -> &str {
        &self.week
    }

    /// Bucket directory name, `week_{week}`.
    pub fn bucket_name(&self) -> &str {
        self.key.name()
    }

    /// Storage key of the bucket itself.
    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    /// Storage key of one uploaded file inside this bucket.
    pub fn file_key(&self, filename: &str) -> Result<ObjectKey, ValidationError> {
        let filename = validate_filename(filename)?;
        self.key
            .child(&filename)
            .map_err(|_| ValidationError::UnsafeFilename(filename))
    }

    /// Storage key of the summary derived from `filename`.
    pub fn summary_key(&self, filename: &str) -> Result<ObjectKey, ValidationError> {
        let filename = validate_filename(filename)?;
        let summary = summary_file_name(&filename);
        self.key
            .child(&summary)
            .map_err(|_| ValidationError::UnsafeFilename(summary))
    }
}

/// Trims an uploaded filename and rejects anything but one plain component.
pub fn validate_filename(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankFilename);
    }
    let unsafe_name = name == "."
        || name == ".."
        || name
            .chars()
            .any(|ch| ch == '/' || ch == '\\' || ch.is_control());
    if unsafe_name {
        return Err(ValidationError::UnsafeFilename(name.to_string()));
    }
    Ok(name.to_string())
}

/// Summary object name for `filename`: its stem plus [`SUMMARY_SUFFIX`].
///
/// `slides.pdf` -> `slides_summary.txt`, `archive.tar.gz` ->
/// `archive.tar_summary.txt`, `README` -> `README_summary.txt`.
pub fn summary_file_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    format!("{stem}{SUMMARY_SUFFIX}")
}
