//! Foreign-key joins from appointments to patients and psychologists.
//!
//! A reference that does not resolve is a data-consistency fault in the
//! mirrored collections. It is carried as [`Joined::Missing`] and rendered
//! with a placeholder; it never aborts a projection.

use crate::model::appointment::Appointment;
use crate::model::patient::Patient;
use crate::model::psychologist::Psychologist;
use std::collections::HashMap;

pub const MISSING_PATIENT_LABEL: &str = "Paciente não encontrado";
pub const MISSING_PSYCHOLOGIST_LABEL: &str = "Psicólogo não encontrado";

/// Outcome of resolving one foreign key.
#[derive(Debug, PartialEq)]
pub enum Joined<'a, T> {
    Resolved(&'a T),
    Missing { id: &'a str },
}

impl<T> Clone for Joined<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Joined<'_, T> {}

impl<'a, T> Joined<'a, T> {
    pub fn resolved(&self) -> Option<&'a T> {
        match self {
            Self::Resolved(value) => Some(*value),
            Self::Missing { .. } => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

impl Joined<'_, Patient> {
    /// Patient name, or a placeholder when the id did not resolve.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Resolved(patient) => &patient.name,
            Self::Missing { .. } => MISSING_PATIENT_LABEL,
        }
    }
}

impl Joined<'_, Psychologist> {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Resolved(psychologist) => &psychologist.name,
            Self::Missing { .. } => MISSING_PSYCHOLOGIST_LABEL,
        }
    }
}

/// Appointment with both references resolved (or marked missing).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppointmentDetails<'a> {
    pub appointment: &'a Appointment,
    pub patient: Joined<'a, Patient>,
    pub psychologist: Joined<'a, Psychologist>,
}

impl AppointmentDetails<'_> {
    /// Whether either reference failed to resolve.
    pub fn has_missing_reference(&self) -> bool {
        self.patient.is_missing() || self.psychologist.is_missing()
    }
}

/// Id lookup tables over the reference collections.
///
/// When an id occurs more than once the first record wins.
pub struct ReferenceIndex<'a> {
    patients: HashMap<&'a str, &'a Patient>,
    psychologists: HashMap<&'a str, &'a Psychologist>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn new(patients: &'a [Patient], psychologists: &'a [Psychologist]) -> Self {
        let mut patient_index = HashMap::with_capacity(patients.len());
        for patient in patients {
            patient_index.entry(patient.id.as_str()).or_insert(patient);
        }
        let mut psychologist_index = HashMap::with_capacity(psychologists.len());
        for psychologist in psychologists {
            psychologist_index
                .entry(psychologist.id.as_str())
                .or_insert(psychologist);
        }
        Self {
            patients: patient_index,
            psychologists: psychologist_index,
        }
    }

    pub fn patient(&self, id: &'a str) -> Joined<'a, Patient> {
        match self.patients.get(id).copied() {
            Some(patient) => Joined::Resolved(patient),
            None => Joined::Missing { id },
        }
    }

    pub fn psychologist(&self, id: &'a str) -> Joined<'a, Psychologist> {
        match self.psychologists.get(id).copied() {
            Some(psychologist) => Joined::Resolved(psychologist),
            None => Joined::Missing { id },
        }
    }

    pub fn join(&self, appointment: &'a Appointment) -> AppointmentDetails<'a> {
        AppointmentDetails {
            appointment,
            patient: self.patient(&appointment.patient_id),
            psychologist: self.psychologist(&appointment.psychologist_id),
        }
    }

    pub fn join_all(
        &self,
        appointments: impl IntoIterator<Item = &'a Appointment>,
    ) -> Vec<AppointmentDetails<'a>> {
        appointments
            .into_iter()
            .map(|appointment| self.join(appointment))
            .collect()
    }
}

/// Resolves one appointment against plain slices.
pub fn join_appointment<'a>(
    appointment: &'a Appointment,
    patients: &'a [Patient],
    psychologists: &'a [Psychologist],
) -> AppointmentDetails<'a> {
    ReferenceIndex::new(patients, psychologists).join(appointment)
}
