//! Use-case error kinds surfaced to callers.

use crate::model::validation::ValidationError;
use crate::store::{InvalidKey, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// What a `NotFound` error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundTarget {
    /// Owner namespace holds no objects.
    Namespace(String),
    /// Named file is absent from its bucket.
    File {
        owner: String,
        subject: String,
        week: String,
        filename: String,
    },
}

/// Errors from use-case services.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller input rejected before any mutation.
    Validation(ValidationError),
    /// Referenced owner or file does not exist. No side effects.
    NotFound(NotFoundTarget),
    /// Backend read/write/delete failure. Earlier batch items stay written.
    Storage(StoreError),
    /// Archive sink rejected a write mid-stream.
    ArchiveStream(std::io::Error),
}

impl ServiceError {
    /// `true` for errors caused by caller input (4xx-equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::NotFound(NotFoundTarget::Namespace(owner)) => {
                write!(f, "no stored material for owner `{owner}`")
            }
            Self::NotFound(NotFoundTarget::File {
                owner,
                subject,
                week,
                filename,
            }) => write!(
                f,
                "file `{filename}` not found in {owner}/{subject}/week {week}"
            ),
            Self::Storage(err) => write!(f, "storage fault: {err}"),
            Self::ArchiveStream(err) => write!(f, "archive stream failed: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
            Self::ArchiveStream(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<InvalidKey> for ServiceError {
    fn from(value: InvalidKey) -> Self {
        Self::Storage(StoreError::InvalidKey(value))
    }
}
