//! Consultation note store.

use super::entity_store::{EntityStore, SyncOutcome};
use crate::model::consultation_note::{ConsultationNote, APPOINTMENT_ID_FIELD};
use crate::remote::FieldFilter;

pub type ConsultationNoteStore = EntityStore<ConsultationNote>;

impl EntityStore<ConsultationNote> {
    /// Replaces the collection with the notes of one appointment, newest
    /// first.
    pub async fn fetch_for_appointment(&self, appointment_id: &str) -> SyncOutcome {
        self.fetch_filtered(Some(FieldFilter::eq(APPOINTMENT_ID_FIELD, appointment_id)))
            .await
    }

    /// Local notes belonging to `appointment_id`.
    pub fn for_appointment(&self, appointment_id: &str) -> Vec<ConsultationNote> {
        self.with_collection(|notes| {
            notes
                .iter()
                .filter(|note| note.appointment_id == appointment_id)
                .cloned()
                .collect()
        })
    }
}
