//! Repository layer over the object store.
//!
//! # Responsibility
//! - Define the append-only assignment log contract.
//! - Serialize read-modify-write cycles per owner.
//!
//! # Invariants
//! - Registry reads never surface parse errors; corrupt content reads as empty.
//! - Record order is append order.

pub mod assignment_log;
pub mod owner_locks;
