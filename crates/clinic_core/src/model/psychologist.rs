//! Psychologist record and weekly availability.

use super::{ActivityStatus, Entity, RecordId};
use crate::remote::OrderBy;
use serde::{Deserialize, Serialize};

/// One weekly availability window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Psychologist {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub availability: Vec<Availability>,
    pub bio: String,
    pub hourly_rate: f64,
    pub status: ActivityStatus,
    pub profile_image: Option<String>,
}

impl Psychologist {
    /// Creates an active psychologist with no availability windows.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            license_number: String::new(),
            specializations: Vec::new(),
            availability: Vec::new(),
            bio: String::new(),
            hourly_rate: 0.0,
            status: ActivityStatus::Active,
            profile_image: None,
        }
    }

    /// Availability windows for one weekday (0 = Sunday).
    pub fn availability_on(&self, day_of_week: u8) -> impl Iterator<Item = &Availability> {
        self.availability
            .iter()
            .filter(move |window| window.day_of_week == day_of_week)
    }
}

impl Entity for Psychologist {
    const TABLE: &'static str = "psychologists";

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> OrderBy {
        OrderBy::ascending("name")
    }
}
