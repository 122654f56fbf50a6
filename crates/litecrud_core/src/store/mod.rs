//! Embedded document store over SQLite.
//!
//! # Responsibility
//! - Own one store handle (connection) per caller scope.
//! - Map entity types to named collections of JSON documents.
//! - Expose a query builder with filter, ordering, skip/limit and count.
//!
//! # Invariants
//! - All collections share the `documents` table keyed by `(collection, id)`.
//! - A handle is closed when it is dropped, on success and failure paths.
//! - Store-level failures are returned unchanged; nothing is retried.

mod collection;
pub mod filter;
mod query;

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::entity::{resolve_collection, ConfigError, Entity};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub use collection::Collection;
pub use filter::Filter;
pub use query::{Query, SortOrder};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by the document store.
#[derive(Debug)]
pub enum StoreError {
    /// Connection, I/O or SQL failure.
    Db(DbError),
    /// Document body could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Filter or ordering expression is malformed.
    InvalidExpression(String),
    /// Entity type has no usable collection binding.
    Config(ConfigError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid document body: {err}"),
            Self::InvalidExpression(message) => write!(f, "invalid query expression: {message}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidExpression(_) => None,
            Self::Config(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Open handle to a document store file.
///
/// Dropping the handle closes the underlying connection.
pub struct DocumentStore {
    conn: Connection,
}

impl DocumentStore {
    /// Opens (or creates) the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory store, mostly useful for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Returns the collection bound to `T`.
    ///
    /// # Errors
    /// - `StoreError::Config` when `T` has no usable collection binding.
    pub fn collection<T: Entity>(&self) -> StoreResult<Collection<'_, T>> {
        let name = resolve_collection::<T>()?;
        Ok(Collection::new(&self.conn, name))
    }

    /// Closes the handle and reports any error raised while closing.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, err)| StoreError::from(err))
    }
}
