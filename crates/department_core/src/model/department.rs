//! Department domain model.
//!
//! # Responsibility
//! - Define the in-memory department record and its shared handle type.
//! - Define the raw row shape read back from `departments`.
//!
//! # Invariants
//! - `id` is `None` until the first successful insert, and is then the
//!   primary key of the matching row.
//! - `name` and `location` are stored as given; no content is rejected.

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Primary key assigned by SQLite on insert.
pub type DepartmentId = i64;

/// Shared handle to the single in-memory instance of a department.
///
/// Two handles refer to the same instance when `Rc::ptr_eq` holds.
pub type DepartmentHandle = Rc<RefCell<Department>>;

/// A department, persisted or not.
///
/// `name` and `location` map to nullable TEXT columns; `None` is stored as NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Row id; `None` while unpersisted.
    pub id: Option<DepartmentId>,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl Department {
    /// Creates an unpersisted department.
    ///
    /// Accepts `&str` for a value or `None` for NULL.
    pub fn new<'s>(
        name: impl Into<Option<&'s str>>,
        location: impl Into<Option<&'s str>>,
    ) -> Self {
        Self {
            id: None,
            name: name.into().map(str::to_owned),
            location: location.into().map(str::to_owned),
        }
    }

    /// Creates a department already tagged with a row id.
    pub fn with_id<'s>(
        id: DepartmentId,
        name: impl Into<Option<&'s str>>,
        location: impl Into<Option<&'s str>>,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(name, location)
        }
    }

    /// Wraps this department into a shared handle.
    pub fn into_handle(self) -> DepartmentHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.name,
            location: row.location,
        }
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = self.name.as_deref().unwrap_or("None");
        let location = self.location.as_deref().unwrap_or("None");
        match self.id {
            Some(id) => write!(f, "<Department {id}: {name}, {location}>"),
            None => write!(f, "<Department None: {name}, {location}>"),
        }
    }
}

/// One stored `departments` row, in column order `(id, name, location)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRow {
    pub id: DepartmentId,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl DepartmentRow {
    /// Reads a row selected as `id, name, location`.
    pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?,
            location: row.get::<_, Option<String>>(2)?,
        })
    }
}

impl From<(DepartmentId, Option<String>, Option<String>)> for DepartmentRow {
    fn from((id, name, location): (DepartmentId, Option<String>, Option<String>)) -> Self {
        Self { id, name, location }
    }
}
