//! Assignment registration and deadline queries.
//!
//! # Invariants
//! - Registration validates every field before touching the registry.
//! - Deadline queries skip records whose deadline is not `YYYY-MM-DD`.

use crate::model::assignment::Assignment;
use crate::model::namespace::OwnerId;
use crate::repo::assignment_log::AssignmentLog;
use crate::service::ServiceResult;
use chrono::{Days, NaiveDate};
use log::{debug, info};
use serde::Serialize;

/// Confirmation returned after a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationReceipt {
    pub owner: String,
    pub assignment: Assignment,
    /// Number of records in the registry after this append.
    pub total: usize,
}

/// Assignment registry use cases.
pub struct AssignmentService<L: AssignmentLog> {
    log: L,
}

impl<L: AssignmentLog> AssignmentService<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }

    /// Appends one assignment to `owner`'s registry.
    pub fn register(
        &self,
        owner: &str,
        subject: &str,
        title: &str,
        deadline: &str,
    ) -> ServiceResult<RegistrationReceipt> {
        let owner = OwnerId::parse(owner)?;
        let assignment = Assignment::new(subject, title, deadline)?;
        let total = self.log.append(&owner, &assignment)?;
        info!(
            "event=assignment_register module=registry status=ok owner={} total={}",
            owner.as_str(),
            total
        );
        Ok(RegistrationReceipt {
            owner: owner.as_str().to_string(),
            assignment,
            total,
        })
    }

    /// All assignments of `owner` in registration order; empty when none.
    pub fn list(&self, owner: &str) -> ServiceResult<Vec<Assignment>> {
        let owner = OwnerId::parse(owner)?;
        Ok(self.log.read_all(&owner)?.unwrap_or_default())
    }

    /// Assignments of `owner` whose deadline falls on `date`.
    pub fn due_on(&self, owner: &str, date: NaiveDate) -> ServiceResult<Vec<Assignment>> {
        let records = self.list(owner)?;
        let mut due = Vec::new();
        for record in records {
            match record.deadline_date() {
                Some(deadline) if deadline == date => due.push(record),
                Some(_) => {}
                None => debug!(
                    "event=assignment_due module=registry status=skipped reason=malformed_deadline"
                ),
            }
        }
        Ok(due)
    }

    /// Assignments of `owner` due the day after `today`.
    pub fn due_tomorrow(&self, owner: &str, today: NaiveDate) -> ServiceResult<Vec<Assignment>> {
        match today.checked_add_days(Days::new(1)) {
            Some(tomorrow) => self.due_on(owner, tomorrow),
            None => Ok(Vec::new()),
        }
    }
}
