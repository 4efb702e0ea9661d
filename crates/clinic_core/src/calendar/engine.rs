//! Calendar projection over the appointment collection.
//!
//! # Responsibility
//! - Filter appointments for a day or a month.
//! - Build the month grid and step the cursor by view granularity.
//! - Keep the cursor/view pair as transient UI state.
//!
//! # Invariants
//! - Every function here is pure over its inputs; no store access, no I/O.
//! - Day membership is decided by exact `YYYY-MM-DD` string equality.

use super::date::{
    add_months, end_of_month, format_calendar_date, is_same_month, parse_calendar_date,
    start_of_month, today,
};
use super::join::{AppointmentDetails, ReferenceIndex};
use crate::model::appointment::Appointment;
use crate::model::patient::Patient;
use crate::model::psychologist::Psychologist;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of columns of the month grid (Sunday first).
pub const GRID_COLUMNS: usize = 7;

/// View granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Day,
    Week,
    Month,
}

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

impl Step {
    fn sign(self) -> i32 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Always true today; leading/trailing days are not generated yet.
    pub is_current_month: bool,
    pub is_today: bool,
}

/// Appointments on `date`, in collection order.
pub fn day_appointments(date: NaiveDate, appointments: &[Appointment]) -> Vec<&Appointment> {
    let key = format_calendar_date(date);
    appointments
        .iter()
        .filter(|appointment| appointment.date == key)
        .collect()
}

/// Appointments dated inside the cursor's month, bounds inclusive.
///
/// Appointments whose `date` does not parse are left out.
pub fn month_appointments(cursor: NaiveDate, appointments: &[Appointment]) -> Vec<&Appointment> {
    appointments
        .iter()
        .filter(|appointment| {
            parse_calendar_date(&appointment.date)
                .map(|date| is_same_month(date, cursor))
                .unwrap_or(false)
        })
        .collect()
}

/// Every day of the cursor's month, first to last.
pub fn month_grid(cursor: NaiveDate, today: NaiveDate) -> Vec<DayCell> {
    let end = end_of_month(cursor);
    start_of_month(cursor)
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| DayCell {
            date,
            is_current_month: true,
            is_today: date == today,
        })
        .collect()
}

/// Moves the cursor one period in `step` direction.
///
/// Month steps clamp the day (`2024-01-31` → `2024-02-29`). At the edge of
/// the representable range the cursor is returned unchanged.
pub fn advance(cursor: NaiveDate, view: CalendarView, step: Step) -> NaiveDate {
    let moved = match view {
        CalendarView::Month => add_months(cursor, step.sign()),
        CalendarView::Week => shift_days(cursor, 7, step),
        CalendarView::Day => shift_days(cursor, 1, step),
    };
    moved.unwrap_or(cursor)
}

fn shift_days(cursor: NaiveDate, days: u64, step: Step) -> Option<NaiveDate> {
    match step {
        Step::Previous => cursor.checked_sub_days(Days::new(days)),
        Step::Next => cursor.checked_add_days(Days::new(days)),
    }
}

/// Month grid cell with its appointments joined.
#[derive(Debug, Clone)]
pub struct GridCell<'a> {
    pub day: DayCell,
    pub appointments: Vec<AppointmentDetails<'a>>,
}

/// What the view renders for one cursor/view pair.
#[derive(Debug, Clone)]
pub struct CalendarProjection<'a> {
    pub cursor: NaiveDate,
    pub view: CalendarView,
    /// Day/week: the cursor day's appointments. Month: the whole month's.
    pub visible: Vec<AppointmentDetails<'a>>,
    /// Present for the month view only.
    pub grid: Option<Vec<GridCell<'a>>>,
}

/// Projects the collections onto the cursor and view.
pub fn project<'a>(
    cursor: NaiveDate,
    view: CalendarView,
    appointments: &'a [Appointment],
    patients: &'a [Patient],
    psychologists: &'a [Psychologist],
    today: NaiveDate,
) -> CalendarProjection<'a> {
    let references = ReferenceIndex::new(patients, psychologists);

    let (visible, grid) = match view {
        CalendarView::Day | CalendarView::Week => {
            (references.join_all(day_appointments(cursor, appointments)), None)
        }
        CalendarView::Month => {
            let cells = month_grid(cursor, today)
                .into_iter()
                .map(|day| GridCell {
                    day,
                    appointments: references.join_all(day_appointments(day.date, appointments)),
                })
                .collect();
            (
                references.join_all(month_appointments(cursor, appointments)),
                Some(cells),
            )
        }
    };

    CalendarProjection {
        cursor,
        view,
        visible,
        grid,
    }
}

/// Cursor and view owned by a calendar screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    pub current_date: NaiveDate,
    pub active_view: CalendarView,
}

impl Default for CalendarState {
    fn default() -> Self {
        Self::new(today())
    }
}

impl CalendarState {
    /// Day view focused on `current_date`.
    pub fn new(current_date: NaiveDate) -> Self {
        Self {
            current_date,
            active_view: CalendarView::Day,
        }
    }

    pub fn go_previous(&mut self) {
        self.current_date = advance(self.current_date, self.active_view, Step::Previous);
    }

    pub fn go_next(&mut self) {
        self.current_date = advance(self.current_date, self.active_view, Step::Next);
    }

    pub fn go_to_today(&mut self) {
        self.current_date = today();
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.active_view = view;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.current_date = date;
    }

    /// Projects the collections with the local clock as "today".
    pub fn project<'a>(
        &self,
        appointments: &'a [Appointment],
        patients: &'a [Patient],
        psychologists: &'a [Psychologist],
    ) -> CalendarProjection<'a> {
        project(
            self.current_date,
            self.active_view,
            appointments,
            patients,
            psychologists,
            today(),
        )
    }
}
