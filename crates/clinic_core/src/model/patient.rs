//! Patient record.

use super::{ActivityStatus, Entity, RecordId};
use crate::remote::OrderBy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredContact {
    Email,
    Phone,
    Whatsapp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub preferred_contact: PreferredContact,
    pub joined_at: String,
    pub status: ActivityStatus,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub notes: Option<String>,
    pub emergency_contact: Option<String>,
    pub profile_image: Option<String>,
    pub total_spent: Option<f64>,
    pub last_appointment: Option<String>,
    pub upcoming_appointment: Option<String>,
    pub preferred_psychologist: Option<RecordId>,
    #[serde(default)]
    pub medical_history: Vec<String>,
}

impl Patient {
    /// Creates an active patient reachable by email.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            date_of_birth: String::new(),
            preferred_contact: PreferredContact::Email,
            joined_at: String::new(),
            status: ActivityStatus::Active,
            insurance_provider: None,
            insurance_number: None,
            notes: None,
            emergency_contact: None,
            profile_image: None,
            total_spent: None,
            last_appointment: None,
            upcoming_appointment: None,
            preferred_psychologist: None,
            medical_history: Vec::new(),
        }
    }
}

impl Entity for Patient {
    const TABLE: &'static str = "patients";

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> OrderBy {
        OrderBy::ascending("name")
    }
}
