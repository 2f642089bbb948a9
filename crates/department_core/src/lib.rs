//! Core persistence logic for departments.
//! This crate owns the department model, its SQLite table and the identity map.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{Department, DepartmentHandle, DepartmentId, DepartmentRow};
pub use repo::department_repo::{DepartmentRepository, RepoResult, SqliteDepartmentRepository};
pub use repo::identity_map::IdentityMap;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
