//! Core logic for the clinic dashboard: calendar projection and entity
//! stores synchronized with a remote record store.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod remote;
pub mod service;
pub mod store;

pub use calendar::{
    advance, day_appointments, format_calendar_date, month_appointments, month_grid,
    parse_calendar_date, project, AppointmentDetails, CalendarError, CalendarProjection,
    CalendarState, CalendarView, DayCell, Joined, Step,
};
pub use config::{ClinicConfig, ConfigError};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::appointment::{
    Appointment, AppointmentStatus, AppointmentType, InsuranceDetails, PaymentStatus,
};
pub use model::consultation_note::ConsultationNote;
pub use model::patient::{Patient, PreferredContact};
pub use model::psychologist::{Availability, Psychologist};
pub use model::{ActivityStatus, Entity, RecordId};
pub use remote::{
    FieldFilter, OrderBy, RecordStore, RemoteError, RemoteResult, SortDirection,
    SqliteRecordStore,
};
pub use service::dashboard::{compute_dashboard_stats, DashboardStats};
pub use store::{
    AppointmentStore, ClinicStores, ConsultationNoteStore, EntityStore, PatientStore,
    PsychologistStore, StoreSnapshot, SyncOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
