//! Domain model for the lecture-material namespace.
//!
//! # Responsibility
//! - Resolve caller identifiers into safe storage keys.
//! - Define assignment and upload records exchanged with callers.
//!
//! # Invariants
//! - Every identifier that reaches storage passed `namespace` validation.

pub mod assignment;
pub mod namespace;
pub mod upload;
pub mod validation;
