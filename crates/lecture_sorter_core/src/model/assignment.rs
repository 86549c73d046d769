//! Assignment record stored in the per-owner registry.
//!
//! # Invariants
//! - Fields are trimmed and non-blank when created through [`Assignment::new`].
//! - `deadline` is kept verbatim; it is only parsed when queried by date.

use crate::model::validation::{require_field, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format the registry and its downstream reminder job agree on.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// One registered assignment, serialized as `{subject, title, deadline}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub subject: String,
    pub title: String,
    /// ISO date string, `YYYY-MM-DD` by convention.
    pub deadline: String,
}

impl Assignment {
    /// Builds a record from raw caller input.
    pub fn new(subject: &str, title: &str, deadline: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            subject: require_field("subject", subject)?,
            title: require_field("title", title)?,
            deadline: require_field("deadline", deadline)?,
        })
    }

    /// Parsed deadline, or `None` when it is not a valid `YYYY-MM-DD` date.
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.deadline.trim(), DEADLINE_FORMAT).ok()
    }
}
