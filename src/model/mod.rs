//! Strongly typed place records
//!
//! These types are the single shape a place takes anywhere in the crate:
//! extraction output, local cache files and backend payloads.

mod hours;
mod place;

pub use hours::{validate_hours, DailyHours, DayOfWeek, HoursError};
pub use place::{EventRecord, MenuItemRecord, PlaceRecord, PromotionRecord};
