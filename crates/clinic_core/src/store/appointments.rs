//! Appointment store and its date queries.

use super::entity_store::EntityStore;
use crate::calendar::date::format_calendar_date;
use crate::model::appointment::Appointment;
use chrono::NaiveDate;

pub type AppointmentStore = EntityStore<Appointment>;

impl EntityStore<Appointment> {
    /// Appointments whose `date` equals `date` exactly.
    pub fn by_date(&self, date: &str) -> Vec<Appointment> {
        self.with_collection(|appointments| {
            appointments
                .iter()
                .filter(|appointment| appointment.date == date)
                .cloned()
                .collect()
        })
    }

    /// Appointments whose `date` string lies in `[start, end]`.
    ///
    /// `YYYY-MM-DD` strings order the same way as the dates they name.
    pub fn by_date_range(&self, start: &str, end: &str) -> Vec<Appointment> {
        self.with_collection(|appointments| {
            appointments
                .iter()
                .filter(|appointment| {
                    appointment.date.as_str() >= start && appointment.date.as_str() <= end
                })
                .cloned()
                .collect()
        })
    }

    /// Same as [`Self::by_date`] for a calendar date value.
    pub fn on_day(&self, date: NaiveDate) -> Vec<Appointment> {
        self.by_date(&format_calendar_date(date))
    }
}
