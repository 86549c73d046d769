//! Use-case services over the object store.
//!
//! # Responsibility
//! - Validate caller input, then orchestrate store and registry calls.
//! - Map storage outcomes onto `Validation | NotFound | Storage` errors.
//!
//! # Invariants
//! - Validation completes before the first storage mutation.
//! - Services stay backend-agnostic; they only see `ObjectStore`.

pub mod archive_service;
pub mod assignment_service;
pub mod deletion_service;
pub mod error;
pub mod ingest_service;
pub mod listing_service;

pub use error::{NotFoundTarget, ServiceError};

pub type ServiceResult<T> = Result<T, ServiceError>;
