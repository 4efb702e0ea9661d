//! Clinic domain records mirrored from the remote record store.
//!
//! # Responsibility
//! - Define the wire shape of appointments, patients, psychologists and
//!   consultation notes.
//! - Bind each record type to its remote collection through [`Entity`].
//!
//! # Invariants
//! - Every record is identified by a stable string `id`.
//! - Field names on the wire are camelCase; enum values keep their
//!   kebab-case spellings (`no-show`, `in-person`).

use crate::remote::OrderBy;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod appointment;
pub mod consultation_note;
pub mod patient;
pub mod psychologist;

/// Primary identity of every record.
pub type RecordId = String;

/// Record type that lives in one remote collection.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Remote collection name.
    const TABLE: &'static str;

    /// Stable record identity.
    fn id(&self) -> &str;

    /// Canonical sort used by a full fetch.
    fn default_order() -> OrderBy;
}

/// Activity flag shared by patients and psychologists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[default]
    Active,
    Inactive,
}
