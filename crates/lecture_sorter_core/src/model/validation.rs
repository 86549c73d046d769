//! Input validation errors shared by resolver, ingest and registry inputs.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected caller input. Always raised before any storage mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty after trimming.
    BlankField(&'static str),
    /// Identifier component contains navigation or separator sequences.
    UnsafeComponent { field: &'static str, value: String },
    /// Identifier collides with a name the layout reserves.
    ReservedName { field: &'static str, value: String },
    /// Uploaded file has no usable name.
    BlankFilename,
    /// Uploaded filename is not a single plain path component.
    UnsafeFilename(String),
    /// Upload batch carries no files.
    EmptyBatch,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::UnsafeComponent { field, value } => write!(
                f,
                "`{field}` contains a path separator or navigation sequence: `{}`",
                value.escape_debug()
            ),
            Self::ReservedName { field, value } => {
                write!(f, "`{field}` uses reserved name `{value}`")
            }
            Self::BlankFilename => write!(f, "uploaded file name must not be blank"),
            Self::UnsafeFilename(name) => write!(
                f,
                "uploaded file name must be a single path component: `{}`",
                name.escape_debug()
            ),
            Self::EmptyBatch => write!(f, "upload batch must contain at least one file"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when blank.
pub(crate) fn require_field(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}
