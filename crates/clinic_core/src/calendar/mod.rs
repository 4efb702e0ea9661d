//! Calendar engine: cursor navigation, interval filtering and month grid.
//!
//! # Responsibility
//! - Project a cursor date and a view granularity onto the appointment
//!   collection.
//! - Join visible appointments with their patient and psychologist.
//!
//! # Invariants
//! - Dates are naive local calendar dates; `YYYY-MM-DD` strings are the join
//!   key against `Appointment::date`.
//! - The engine reads collections handed to it and never touches stores.

pub mod date;
pub mod engine;
pub mod join;
pub mod labels;

pub use date::{format_calendar_date, parse_calendar_date, CalendarError};
pub use engine::{
    advance, day_appointments, month_appointments, month_grid, project,
    CalendarProjection, CalendarState, CalendarView, DayCell, GridCell, Step,
};
pub use join::{join_appointment, AppointmentDetails, Joined, ReferenceIndex};
