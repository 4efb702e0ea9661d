//! Consultation note attached to an appointment.

use super::{Entity, RecordId};
use crate::remote::OrderBy;
use serde::{Deserialize, Serialize};

/// Wire name of the appointment foreign key, used for filtered fetches.
pub const APPOINTMENT_ID_FIELD: &str = "appointmentId";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationNote {
    pub id: RecordId,
    pub appointment_id: RecordId,
    pub date: String,
    pub psychologist_id: RecordId,
    pub content: String,
    pub is_private: bool,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub follow_up_date: Option<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    /// Assigned by the record store on insert.
    pub created_at: Option<String>,
}

impl ConsultationNote {
    pub fn new(
        id: impl Into<RecordId>,
        appointment_id: impl Into<RecordId>,
        psychologist_id: impl Into<RecordId>,
        date: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            appointment_id: appointment_id.into(),
            date: date.into(),
            psychologist_id: psychologist_id.into(),
            content: content.into(),
            is_private: false,
            diagnosis: None,
            treatment: None,
            follow_up_date: None,
            medications: Vec::new(),
            created_at: None,
        }
    }
}

impl Entity for ConsultationNote {
    const TABLE: &'static str = "consultation_notes";

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> OrderBy {
        OrderBy::descending("createdAt")
    }
}
