//! Remote record store contract.
//!
//! # Responsibility
//! - Describe the table-like service the entity stores synchronize with.
//! - Keep transport details behind one object-safe async trait.
//!
//! # Invariants
//! - Records cross this boundary as JSON objects keyed by `id`.
//! - Writes return the record as stored, which may differ from the input.
//! - Implementations never retry; retry policy belongs to callers.

use crate::db::DbError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite_store;

pub use sqlite_store::SqliteRecordStore;

static FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid field name regex"));

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure reported by a remote record store operation.
#[derive(Debug)]
pub enum RemoteError {
    /// Transport or worker failure before the store answered.
    Transport(String),
    Db(DbError),
    NotFound { table: String, id: String },
    Conflict { table: String, id: String },
    /// Payload is not a JSON object or stored data failed to decode.
    InvalidRecord(String),
    /// Filter or order field name is not a plain identifier.
    InvalidField(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "remote transport failure: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { table, id } => write!(f, "record not found: {table}/{id}"),
            Self::Conflict { table, id } => write!(f, "record already exists: {table}/{id}"),
            Self::InvalidRecord(message) => write!(f, "invalid record: {message}"),
            Self::InvalidField(field) => write!(f, "invalid field name `{field}`"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RemoteError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RemoteError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidRecord(value.to_string())
    }
}

/// Equality filter on one top-level field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Single-field sort applied by `select`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Table-backed record service consumed by entity stores.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reads a collection, optionally filtered, sorted by one field.
    async fn select(
        &self,
        table: &str,
        filter: Option<&FieldFilter>,
        order: &OrderBy,
    ) -> RemoteResult<Vec<Value>>;

    /// Stores a new record and returns it as persisted.
    async fn insert(&self, table: &str, record: Value) -> RemoteResult<Value>;

    /// Merges `partial` into the record keyed by `id` and returns the result.
    async fn update(&self, table: &str, id: &str, partial: Value) -> RemoteResult<Value>;

    /// Removes the record keyed by `id`. Missing ids are not an error.
    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()>;
}

/// Rejects field names that are not plain identifiers.
pub fn validate_field_name(field: &str) -> RemoteResult<()> {
    if FIELD_NAME_RE.is_match(field) {
        Ok(())
    } else {
        Err(RemoteError::InvalidField(field.to_string()))
    }
}
