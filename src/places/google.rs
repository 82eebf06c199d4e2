//! Places API (New) record shapes
//!
//! Only the fields the formatter reads are declared; everything else in the
//! API response is ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePlace {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default)]
    pub primary_type: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub postal_address: Option<PostalAddress>,
    #[serde(default)]
    pub regular_opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub national_phone_number: Option<String>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<String>,
    #[serde(default)]
    pub business_status: Option<String>,
}

impl GooglePlace {
    pub fn is_operational(&self) -> bool {
        self.business_status.as_deref() == Some("OPERATIONAL")
    }

    pub fn display_text(&self) -> Option<&str> {
        self.display_name.as_ref().map(|n| n.text.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: String,
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub administrative_area: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub address_lines: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub periods: Vec<Period>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Period {
    #[serde(default)]
    pub open: Option<TimePoint>,
    #[serde(default)]
    pub close: Option<TimePoint>,
}

/// A point in the week; `day` counts from 0 = Sunday
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TimePoint {
    #[serde(default)]
    pub day: Option<u8>,
    #[serde(default)]
    pub hour: u8,
    #[serde(default)]
    pub minute: u8,
}
