//! Entity stores mirroring remote collections.
//!
//! # Responsibility
//! - Provide one store instance per entity type, injected with the record
//!   store they synchronize with.
//! - Expose derived, network-free queries over the mirrored collections.
//!
//! # Invariants
//! - Stores are explicit instances; nothing here is a process-wide
//!   singleton.

pub mod appointments;
pub mod entity_store;
pub mod notes;

use crate::model::patient::Patient;
use crate::model::psychologist::Psychologist;
use crate::remote::RecordStore;
use std::sync::Arc;

pub use appointments::AppointmentStore;
pub use entity_store::{EntityStore, StoreSnapshot, SyncOutcome};
pub use notes::ConsultationNoteStore;

pub type PatientStore = EntityStore<Patient>;
pub type PsychologistStore = EntityStore<Psychologist>;

/// The four clinic stores sharing one record store.
pub struct ClinicStores {
    pub appointments: AppointmentStore,
    pub patients: PatientStore,
    pub psychologists: PsychologistStore,
    pub notes: ConsultationNoteStore,
}

impl ClinicStores {
    pub fn new(remote: Arc<dyn RecordStore>) -> Self {
        Self {
            appointments: AppointmentStore::new(Arc::clone(&remote)),
            patients: PatientStore::new(Arc::clone(&remote)),
            psychologists: PsychologistStore::new(Arc::clone(&remote)),
            notes: ConsultationNoteStore::new(remote),
        }
    }

    /// Fetches appointments, patients and psychologists concurrently.
    ///
    /// Notes are loaded on demand per appointment and are not part of this.
    pub async fn fetch_calendar_data(&self) -> [SyncOutcome; 3] {
        let (appointments, patients, psychologists) = tokio::join!(
            self.appointments.fetch(),
            self.patients.fetch(),
            self.psychologists.fetch()
        );
        [appointments, patients, psychologists]
    }
}
