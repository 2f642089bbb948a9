//! Repository layer for department persistence.
//!
//! # Responsibility
//! - Define the department data access contract.
//! - Keep SQL details and identity caching out of callers.
//!
//! # Invariants
//! - Materialized rows go through the injected `IdentityMap`, so one row has
//!   at most one live handle per map.
//! - Driver errors are returned as-is inside `DbError`; lookups that miss
//!   return `None`, not an error.

pub mod department_repo;
pub mod identity_map;
