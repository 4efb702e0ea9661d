//! Dashboard statistics derived from the mirrored collections.
//!
//! # Responsibility
//! - Aggregate appointment counts and revenue for the dashboard cards.
//! - Break activity down per psychologist for today and the current week.
//!
//! # Invariants
//! - Pure over its inputs; `today` is supplied by the caller.
//! - Revenue counts `paymentAmount` of every appointment whose payment is
//!   not pending. Missing amounts count as zero.
//! - Weeks start on Sunday, matching the calendar grid.

use crate::calendar::date::parse_calendar_date;
use crate::model::appointment::{Appointment, AppointmentStatus, AppointmentType, PaymentStatus};
use crate::model::patient::Patient;
use crate::model::psychologist::Psychologist;
use crate::model::{ActivityStatus, RecordId};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueByType {
    pub insurance: f64,
    pub private: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsByType {
    pub in_person: usize,
    pub online: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychologistStats {
    pub id: RecordId,
    pub name: String,
    pub appointments_today: usize,
    pub appointments_this_week: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_appointments: usize,
    pub completed_appointments: usize,
    pub cancelled_appointments: usize,
    pub total_revenue: f64,
    /// Scheduled or confirmed appointments dated today or later.
    pub upcoming_appointments: usize,
    pub active_patients: usize,
    pub active_psychologists: usize,
    pub revenue_by_type: RevenueByType,
    pub appointments_by_type: AppointmentsByType,
    pub psychologist_stats: Vec<PsychologistStats>,
}

/// Computes dashboard figures relative to `today`.
pub fn compute_dashboard_stats(
    appointments: &[Appointment],
    patients: &[Patient],
    psychologists: &[Psychologist],
    today: NaiveDate,
) -> DashboardStats {
    let mut stats = DashboardStats {
        total_appointments: appointments.len(),
        active_patients: patients
            .iter()
            .filter(|patient| patient.status == ActivityStatus::Active)
            .count(),
        active_psychologists: psychologists
            .iter()
            .filter(|psychologist| psychologist.status == ActivityStatus::Active)
            .count(),
        ..DashboardStats::default()
    };

    for appointment in appointments {
        match appointment.status {
            AppointmentStatus::Completed => stats.completed_appointments += 1,
            AppointmentStatus::Cancelled => stats.cancelled_appointments += 1,
            _ => {}
        }

        match appointment.kind {
            AppointmentType::InPerson => stats.appointments_by_type.in_person += 1,
            AppointmentType::Online => stats.appointments_by_type.online += 1,
        }

        let revenue = collected_amount(appointment);
        stats.total_revenue += revenue;
        if appointment.payment_status == PaymentStatus::Insurance {
            stats.revenue_by_type.insurance += revenue;
        } else {
            stats.revenue_by_type.private += revenue;
        }

        let is_upcoming = appointment.status.is_pending()
            && parse_calendar_date(&appointment.date)
                .map(|date| date >= today)
                .unwrap_or(false);
        if is_upcoming {
            stats.upcoming_appointments += 1;
        }
    }

    let (week_start, week_end) = week_bounds(today);
    stats.psychologist_stats = psychologists
        .iter()
        .map(|psychologist| {
            let mut entry = PsychologistStats {
                id: psychologist.id.clone(),
                name: psychologist.name.clone(),
                appointments_today: 0,
                appointments_this_week: 0,
                revenue: 0.0,
            };
            for appointment in appointments
                .iter()
                .filter(|appointment| appointment.psychologist_id == psychologist.id)
            {
                entry.revenue += collected_amount(appointment);
                if let Ok(date) = parse_calendar_date(&appointment.date) {
                    if date == today {
                        entry.appointments_today += 1;
                    }
                    if week_start <= date && date <= week_end {
                        entry.appointments_this_week += 1;
                    }
                }
            }
            entry
        })
        .collect();

    stats
}

/// Sunday..Saturday week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    let start = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    (start, end)
}

fn collected_amount(appointment: &Appointment) -> f64 {
    if appointment.payment_status == PaymentStatus::Pending {
        0.0
    } else {
        appointment.payment_amount.unwrap_or(0.0)
    }
}
