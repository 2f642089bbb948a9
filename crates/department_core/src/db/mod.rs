//! SQLite connection bootstrap for department storage.
//!
//! # Responsibility
//! - Open and configure SQLite connections handed to repositories.
//! - Carry driver failures to callers without translating them.
//!
//! # Invariants
//! - Opening a connection never creates or alters the `departments` table;
//!   table lifecycle belongs to the repository.
//! - `DbError::Sqlite` keeps the original driver error as its `source()`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage failure surfaced by core persistence calls.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Returns the underlying driver error.
    pub fn as_sqlite(&self) -> &rusqlite::Error {
        match self {
            Self::Sqlite(err) => err,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
