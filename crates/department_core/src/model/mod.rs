//! Domain model for department records.
//!
//! # Responsibility
//! - Define the canonical data structures used by repository logic.
//!
//! # Invariants
//! - A persisted department is identified by its integer row id.
//! - Deletion is a hard delete; there are no tombstones.

pub mod department;
