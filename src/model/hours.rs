//! Opening hours types
//!
//! Hours are kept as one entry per day of week. A place open around the clock
//! on a given day has `open_hour == close_hour == 0` and no minutes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Day of the week, serialized with its full English name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Maps a Sunday-based index (0 = Sunday .. 6 = Saturday) to a day
    ///
    /// This is the numbering the maps API uses in opening-hour periods.
    pub fn from_sunday_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }

    /// Returns the full English name of the day
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised when hours fall outside the clock
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoursError {
    #[error("{day} {field} must be between 0 and 23, got {value}")]
    HourOutOfRange {
        day: DayOfWeek,
        field: &'static str,
        value: u8,
    },

    #[error("{day} {field} must be between 0 and 59, got {value}")]
    MinuteOutOfRange {
        day: DayOfWeek,
        field: &'static str,
        value: u8,
    },
}

/// Opening hours for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyHours {
    pub day: DayOfWeek,
    pub open_hour: u8,
    #[serde(default)]
    pub open_minute: Option<u8>,
    pub close_hour: u8,
    #[serde(default)]
    pub close_minute: Option<u8>,
}

impl DailyHours {
    /// Creates an entry for a place that is open the whole day
    pub fn all_day(day: DayOfWeek) -> Self {
        Self {
            day,
            open_hour: 0,
            open_minute: None,
            close_hour: 0,
            close_minute: None,
        }
    }

    /// Returns true if this entry follows the all-day convention
    pub fn is_all_day(&self) -> bool {
        self.open_hour == 0
            && self.close_hour == 0
            && self.open_minute.unwrap_or(0) == 0
            && self.close_minute.unwrap_or(0) == 0
    }

    /// Checks that every hour is in 0-23 and every minute in 0-59
    pub fn validate(&self) -> Result<(), HoursError> {
        for (field, value) in [("open_hour", self.open_hour), ("close_hour", self.close_hour)] {
            if value > 23 {
                return Err(HoursError::HourOutOfRange {
                    day: self.day,
                    field,
                    value,
                });
            }
        }

        for (field, value) in [
            ("open_minute", self.open_minute),
            ("close_minute", self.close_minute),
        ] {
            if let Some(value) = value.filter(|m| *m > 59) {
                return Err(HoursError::MinuteOutOfRange {
                    day: self.day,
                    field,
                    value,
                });
            }
        }

        Ok(())
    }
}

/// Validates a whole list of hours entries
pub fn validate_hours(hours: &[DailyHours]) -> Result<(), HoursError> {
    hours.iter().try_for_each(DailyHours::validate)
}
