//! Appointment record.
//!
//! # Invariants
//! - `date` is a naive `YYYY-MM-DD` calendar date string and is the only key
//!   deciding which calendar day an appointment belongs to.
//! - `start_time < end_time` is expected but not enforced here.

use super::{Entity, RecordId};
use crate::remote::OrderBy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Whether the appointment is still expected to happen.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    InPerson,
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Partial,
    Insurance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceDetails {
    pub provider: String,
    pub authorization_number: Option<String>,
    pub coverage_percentage: f64,
}

/// One scheduled session between a patient and a psychologist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub psychologist_id: RecordId,
    /// `YYYY-MM-DD`, compared verbatim by day views.
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub session_notes: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub insurance_details: Option<InsuranceDetails>,
    pub payment_amount: Option<f64>,
}

impl Appointment {
    /// Creates a scheduled, unpaid in-person appointment.
    pub fn new(
        id: impl Into<RecordId>,
        patient_id: impl Into<RecordId>,
        psychologist_id: impl Into<RecordId>,
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            patient_id: patient_id.into(),
            psychologist_id: psychologist_id.into(),
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            status: AppointmentStatus::Scheduled,
            kind: AppointmentType::InPerson,
            payment_status: PaymentStatus::Pending,
            notes: None,
            session_notes: None,
            diagnosis: None,
            treatment: None,
            insurance_details: None,
            payment_amount: None,
        }
    }
}

impl Entity for Appointment {
    const TABLE: &'static str = "appointments";

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> OrderBy {
        OrderBy::ascending("date")
    }
}
