//! Naive calendar date helpers.
//!
//! # Invariants
//! - Formatting reads the date's own year/month/day fields; no timezone
//!   conversion happens anywhere in this module.
//! - Month arithmetic clamps the day to the target month's last day.

use chrono::{Datelike, Local, Months, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    InvalidDate(String),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => {
                write!(f, "invalid calendar date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for CalendarError {}

/// Canonical `YYYY-MM-DD` key matched against `Appointment::date`.
pub fn format_calendar_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parses a strict `YYYY-MM-DD` string.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, CalendarError> {
    // chrono skips whitespace before numeric fields and accepts unpadded
    // ones; the join key must be exactly `dddd-dd-dd`.
    if !has_canonical_shape(value) {
        return Err(CalendarError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, CALENDAR_DATE_FORMAT)
        .map_err(|_| CalendarError::InvalidDate(value.to_string()))
}

fn has_canonical_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Today's date on the local wall clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = start_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        // December of the last representable year.
        .unwrap_or(NaiveDate::MAX)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    end_of_month(date).day()
}

/// Shifts by whole months, clamping the day (`Jan 31 + 1 = Feb 28/29`).
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let delta = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(delta)
    } else {
        date.checked_sub_months(delta)
    }
}

/// Whether `date` falls inside the month containing `cursor`.
pub fn is_same_month(date: NaiveDate, cursor: NaiveDate) -> bool {
    date.year() == cursor.year() && date.month() == cursor.month()
}
