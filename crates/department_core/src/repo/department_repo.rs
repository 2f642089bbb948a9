//! Department repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide table lifecycle and CRUD APIs over the `departments` table.
//! - Map stored rows to shared handles through the injected identity map.
//!
//! # Invariants
//! - An insert assigns `last_insert_rowid` to the department and caches it.
//! - Ids come from `AUTOINCREMENT`, so an id is never handed out twice, even
//!   after its row is deleted.
//! - A delete evicts the cache entry and resets the department id to `None`.
//! - Materializing a cached id returns the cached handle untouched; stored
//!   `name`/`location` do not overwrite in-memory state.
//! - Every mutation is a single autocommitted statement.

use crate::db::DbResult;
use crate::model::department::{Department, DepartmentHandle, DepartmentId, DepartmentRow};
use crate::repo::identity_map::IdentityMap;
use log::debug;
use rusqlite::{params, Connection, ToSql};

const DEPARTMENT_SELECT_SQL: &str = "SELECT id, name, location FROM departments";

pub type RepoResult<T> = DbResult<T>;

/// Repository interface for department persistence.
pub trait DepartmentRepository {
    /// Ensures the `departments` table exists.
    fn create_table(&self) -> RepoResult<()>;
    /// Removes the `departments` table if present.
    fn drop_table(&self) -> RepoResult<()>;
    /// Builds a department and persists it immediately.
    ///
    /// `None` stores NULL for that column.
    fn create<'s>(
        &self,
        name: impl Into<Option<&'s str>>,
        location: impl Into<Option<&'s str>>,
    ) -> RepoResult<DepartmentHandle>;
    /// Inserts an unpersisted department, or updates a persisted one.
    fn save(&self, department: &DepartmentHandle) -> RepoResult<()>;
    /// Writes in-memory `name`/`location` to the row matching the id.
    fn update(&self, department: &DepartmentHandle) -> RepoResult<()>;
    /// Deletes the matching row and forgets the department's id.
    fn delete(&self, department: &DepartmentHandle) -> RepoResult<()>;
    /// Returns the live handle for a stored row.
    fn instance_from_db(&self, row: DepartmentRow) -> DepartmentHandle;
    /// Returns every stored department in scan order.
    fn get_all(&self) -> RepoResult<Vec<DepartmentHandle>>;
    fn find_by_id(&self, id: DepartmentId) -> RepoResult<Option<DepartmentHandle>>;
    /// Returns the first department whose name matches exactly.
    ///
    /// Rows with a NULL name never match.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<DepartmentHandle>>;
}

/// SQLite-backed department repository.
///
/// Both the connection and the identity map are borrowed from the caller, so
/// several repositories may share one cache.
pub struct SqliteDepartmentRepository<'a> {
    conn: &'a Connection,
    cache: &'a IdentityMap,
}

impl<'a> SqliteDepartmentRepository<'a> {
    pub fn new(conn: &'a Connection, cache: &'a IdentityMap) -> Self {
        Self { conn, cache }
    }

    /// Returns the identity map backing this repository.
    pub fn cache(&self) -> &'a IdentityMap {
        self.cache
    }

    fn insert(&self, department: &DepartmentHandle) -> RepoResult<()> {
        {
            let current = department.borrow();
            self.conn.execute(
                "INSERT INTO departments (name, location) VALUES (?1, ?2);",
                params![current.name.as_deref(), current.location.as_deref()],
            )?;
        }

        let id = self.conn.last_insert_rowid();
        department.borrow_mut().id = Some(id);
        self.cache.register(department);
        debug!("event=department_insert module=repo status=ok id={id}");
        Ok(())
    }

    fn find_first(
        &self,
        column: &str,
        value: &dyn ToSql,
    ) -> RepoResult<Option<DepartmentHandle>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DEPARTMENT_SELECT_SQL} WHERE {column} = ?1 LIMIT 1;"
        ))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            let row = DepartmentRow::from_sql_row(row)?;
            return Ok(Some(self.instance_from_db(row)));
        }

        Ok(None)
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS departments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                location TEXT
            );",
        )?;
        debug!("event=table_create module=repo status=ok table=departments");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS departments;")?;
        debug!("event=table_drop module=repo status=ok table=departments");
        Ok(())
    }

    fn create<'s>(
        &self,
        name: impl Into<Option<&'s str>>,
        location: impl Into<Option<&'s str>>,
    ) -> RepoResult<DepartmentHandle> {
        let department = Department::new(name, location).into_handle();
        self.save(&department)?;
        Ok(department)
    }

    fn save(&self, department: &DepartmentHandle) -> RepoResult<()> {
        let persisted = department.borrow().is_persisted();
        if persisted {
            self.update(department)
        } else {
            self.insert(department)
        }
    }

    fn update(&self, department: &DepartmentHandle) -> RepoResult<()> {
        let current = department.borrow();
        let changed = self.conn.execute(
            "UPDATE departments
             SET name = ?1, location = ?2
             WHERE id = ?3;",
            params![
                current.name.as_deref(),
                current.location.as_deref(),
                current.id
            ],
        )?;

        debug!(
            "event=department_update module=repo status=ok id={:?} changed={changed}",
            current.id
        );
        Ok(())
    }

    fn delete(&self, department: &DepartmentHandle) -> RepoResult<()> {
        let id = department.borrow().id;
        let changed = self
            .conn
            .execute("DELETE FROM departments WHERE id = ?1;", params![id])?;

        if let Some(id) = id {
            self.cache.evict(id);
        }
        department.borrow_mut().id = None;

        debug!("event=department_delete module=repo status=ok id={id:?} changed={changed}");
        Ok(())
    }

    fn instance_from_db(&self, row: DepartmentRow) -> DepartmentHandle {
        if let Some(cached) = self.cache.get(row.id) {
            return cached;
        }

        let department = Department::from(row).into_handle();
        self.cache.register(&department);
        department
    }

    fn get_all(&self) -> RepoResult<Vec<DepartmentHandle>> {
        let mut stmt = self.conn.prepare(&format!("{DEPARTMENT_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();

        while let Some(row) = rows.next()? {
            let row = DepartmentRow::from_sql_row(row)?;
            departments.push(self.instance_from_db(row));
        }

        Ok(departments)
    }

    fn find_by_id(&self, id: DepartmentId) -> RepoResult<Option<DepartmentHandle>> {
        self.find_first("id", &id)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<DepartmentHandle>> {
        self.find_first("name", &name)
    }
}

#[cfg(test)]
mod tests {
    use super::{DepartmentRepository, SqliteDepartmentRepository};
    use crate::db::open_db_in_memory;
    use crate::model::department::{Department, DepartmentRow};
    use crate::repo::identity_map::IdentityMap;
    use std::rc::Rc;

    #[test]
    fn instance_from_db_registers_uncached_rows() {
        let conn = open_db_in_memory().unwrap();
        let cache = IdentityMap::new();
        let repo = SqliteDepartmentRepository::new(&conn, &cache);

        let handle = repo.instance_from_db(DepartmentRow::from((
            9,
            Some("Legal".to_string()),
            Some("Tower".to_string()),
        )));

        assert_eq!(handle.borrow().id, Some(9));
        assert!(Rc::ptr_eq(&cache.get(9).unwrap(), &handle));
    }

    #[test]
    fn instance_from_db_prefers_cached_state_over_row() {
        let conn = open_db_in_memory().unwrap();
        let cache = IdentityMap::new();
        let repo = SqliteDepartmentRepository::new(&conn, &cache);

        let first = repo.instance_from_db(DepartmentRow::from((
            2,
            Some("Legal".to_string()),
            Some("Tower".to_string()),
        )));
        let second = repo.instance_from_db(DepartmentRow::from((
            2,
            Some("Renamed".to_string()),
            Some("Elsewhere".to_string()),
        )));

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.borrow().name.as_deref(), Some("Legal"));
        assert_eq!(second.borrow().location.as_deref(), Some("Tower"));
    }

    #[test]
    fn save_assigns_row_id_and_caches() {
        let conn = open_db_in_memory().unwrap();
        let cache = IdentityMap::new();
        let repo = SqliteDepartmentRepository::new(&conn, &cache);
        repo.create_table().unwrap();

        let handle = Department::new("Ops", "Annex").into_handle();
        repo.save(&handle).unwrap();

        let id = handle.borrow().id.unwrap();
        assert_eq!(id, conn.last_insert_rowid());
        assert!(Rc::ptr_eq(&repo.cache().get(id).unwrap(), &handle));
    }
}
