//! Identity cache for materialized departments.
//!
//! # Responsibility
//! - Hold at most one live handle per persisted department id.
//! - Stay an explicit, injectable object so callers can scope caches.
//!
//! # Invariants
//! - Every entry's key equals the `id` of the department it points to at
//!   registration time.
//! - Unpersisted departments (`id = None`) are never cached.

use crate::model::department::{DepartmentHandle, DepartmentId};
use std::cell::RefCell;
use std::collections::HashMap;

/// Primary-key keyed cache of department handles.
#[derive(Debug, Default)]
pub struct IdentityMap {
    entries: RefCell<HashMap<DepartmentId, DepartmentHandle>>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached handle for `id`, if any.
    pub fn get(&self, id: DepartmentId) -> Option<DepartmentHandle> {
        self.entries.borrow().get(&id).cloned()
    }

    /// Caches `handle` under its current id.
    ///
    /// Returns `false` without caching when the department has no id. A
    /// previous entry for the same id is replaced.
    pub fn register(&self, handle: &DepartmentHandle) -> bool {
        let Some(id) = handle.borrow().id else {
            return false;
        };
        self.entries.borrow_mut().insert(id, handle.clone());
        true
    }

    /// Removes and returns the entry for `id`.
    pub fn evict(&self, id: DepartmentId) -> Option<DepartmentHandle> {
        self.entries.borrow_mut().remove(&id)
    }

    pub fn contains(&self, id: DepartmentId) -> bool {
        self.entries.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drops every cached handle.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
