//! Place record types
//!
//! Every struct here rejects unknown fields at deserialization, so a record
//! can only ever carry the fields declared below.

use crate::model::hours::{validate_hours, DailyHours, HoursError};
use serde::{Deserialize, Serialize};

/// Canonical business entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceRecord {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state_code: String,
    pub zip: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub hours: Option<Vec<DailyHours>>,
    #[serde(default)]
    pub amenity: Option<String>,
    #[serde(default)]
    pub cuisine: Option<Vec<String>>,
    #[serde(default)]
    pub price_level: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
    #[serde(default)]
    pub primary_type: Option<String>,
    #[serde(default)]
    pub secondary_types: Option<Vec<String>>,
    #[serde(default)]
    pub promotion_data: Option<Vec<PromotionRecord>>,
    #[serde(default)]
    pub menu_data: Option<Vec<MenuItemRecord>>,
    #[serde(default)]
    pub event_data: Option<Vec<EventRecord>>,
}

/// Recurring or ongoing deal (happy hour, weekly special)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromotionRecord {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hours: Option<Vec<DailyHours>>,
}

impl PromotionRecord {
    /// Returns true if the promotion carries everything the backend requires
    pub fn is_publishable(&self) -> bool {
        !self.title.trim().is_empty()
            && self
                .description
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty())
            && self.hours.as_ref().is_some_and(|h| !h.is_empty())
    }
}

/// Single menu entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItemRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
}

/// One-off, date-bound event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventRecord {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub hours: Option<Vec<DailyHours>>,
}

impl PlaceRecord {
    /// Returns the coordinates when both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Checks every hours list on the place and its nested records
    pub fn validate(&self) -> Result<(), HoursError> {
        if let Some(hours) = &self.hours {
            validate_hours(hours)?;
        }

        for promotion in self.promotion_data.iter().flatten() {
            if let Some(hours) = &promotion.hours {
                validate_hours(hours)?;
            }
        }

        for event in self.event_data.iter().flatten() {
            if let Some(hours) = &event.hours {
                validate_hours(hours)?;
            }
        }

        Ok(())
    }
}
