//! Formatting of raw Google Places records
//!
//! Records returned by the Places API (New) nearby search are reduced to
//! [`PlaceRecord`]s and written to the local cache, one file per place.

mod google;

pub use google::{
    GooglePlace, LatLng, LocalizedText, OpeningHours, Period, PostalAddress, TimePoint,
};

use crate::cache::{write_entry, LocalCacheEntry};
use crate::model::{validate_hours, DailyHours, DayOfWeek, PlaceRecord};
use crate::pipeline::Confirm;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Types that carry no information about the business
const GENERIC_TYPES: [&str; 2] = ["point_of_interest", "establishment"];

/// A formatted place plus the required values the raw record lacked
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedPlace {
    pub place: PlaceRecord,
    pub missing_fields: Vec<&'static str>,
}

impl FormattedPlace {
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

/// Counts from one formatting run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSummary {
    pub written: Vec<PathBuf>,
    pub not_operational: usize,
    pub declined: usize,
    /// Places whose cache file could not be written
    pub failed: usize,
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Truncates ZIP+4 codes to the five-digit ZIP
fn normalize_zip(postal_code: &str) -> String {
    let code = postal_code.trim();
    let bytes = code.as_bytes();
    if bytes.len() == 10 && bytes[5] == b'-' && bytes[..5].iter().all(u8::is_ascii_digit) {
        code[..5].to_string()
    } else {
        code.to_string()
    }
}

/// Converts opening periods; Google numbers days from 0 = Sunday
///
/// A period with no close time means the place never closes and becomes an
/// all-day entry.
fn convert_periods(periods: &[Period]) -> Vec<DailyHours> {
    periods
        .iter()
        .filter_map(|period| {
            let open = period.open.as_ref()?;
            let day = DayOfWeek::from_sunday_index(open.day?)?;
            Some(match &period.close {
                Some(close) => DailyHours {
                    day,
                    open_hour: open.hour,
                    open_minute: Some(open.minute),
                    close_hour: close.hour,
                    close_minute: Some(close.minute),
                },
                None => DailyHours::all_day(day),
            })
        })
        .collect()
}

/// Reduces a raw record to a place record
pub fn format_place(raw: &GooglePlace) -> FormattedPlace {
    let mut missing = Vec::new();
    let mut place = PlaceRecord::default();

    match raw.display_name.as_ref().map(|n| n.text.trim()) {
        Some(name) if !name.is_empty() => place.name = name.to_string(),
        _ => missing.push("name"),
    }

    match &raw.location {
        Some(location) => {
            place.latitude = Some(round6(location.latitude));
            place.longitude = Some(round6(location.longitude));
        }
        None => missing.extend(["latitude", "longitude"]),
    }

    place.primary_type = raw.primary_type.clone();
    let types: Vec<String> = raw
        .types
        .iter()
        .filter(|t| !GENERIC_TYPES.contains(&t.as_str()))
        .cloned()
        .collect();
    if !types.is_empty() {
        place.secondary_types = Some(types);
    }

    let address = raw.postal_address.clone().unwrap_or_default();
    match address.address_lines.first() {
        Some(street) => place.street = street.clone(),
        None => missing.push("street"),
    }
    match address.locality {
        Some(city) => place.city = city,
        None => missing.push("city"),
    }
    match address.administrative_area {
        Some(state) => place.state_code = state,
        None => missing.push("state_code"),
    }
    match address.postal_code {
        Some(zip) => place.zip = normalize_zip(&zip),
        None => missing.push("zip"),
    }

    let periods = raw
        .regular_opening_hours
        .as_ref()
        .map(|h| h.periods.as_slice())
        .unwrap_or_default();
    let hours = convert_periods(periods);
    if hours.is_empty() {
        missing.push("hours");
    } else if let Err(e) = validate_hours(&hours) {
        tracing::warn!(name = %place.name, "Dropping opening hours: {}", e);
        missing.push("hours");
    } else {
        place.hours = Some(hours);
    }

    match &raw.national_phone_number {
        Some(phone) => place.phone = Some(phone.clone()),
        None => missing.push("phone"),
    }
    match &raw.website_uri {
        Some(website) => place.website = Some(website.clone()),
        None => missing.push("website"),
    }

    place.rating = raw.rating;
    place.price_level = raw.price_level.clone();

    FormattedPlace {
        place,
        missing_fields: missing,
    }
}

/// File-system safe name for a place: alphanumerics, `-` and `_` kept,
/// spaces turned into `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .replace(' ', "_")
}

/// `<stem>.json` in `dir`, or `<stem>_2.json`, `<stem>_3.json`, ... when an
/// earlier place of the same run already took the name
fn unique_path(dir: &Path, stem: &str, used: &HashSet<PathBuf>) -> PathBuf {
    let mut path = dir.join(format!("{}.json", stem));
    let mut n = 2;
    while used.contains(&path) {
        path = dir.join(format!("{}_{}.json", stem, n));
        n += 1;
    }
    path
}

/// Formats every operational place in a JSON array file
///
/// Each place is written to `output_dir` as `<sanitized name>.json`, with a
/// numeric suffix for repeated names. Places with missing fields, and files
/// left by an earlier run, are written only if `confirm` agrees. A place that
/// cannot be written is logged and counted; the rest are still written.
pub fn format_places_file(
    input: &Path,
    output_dir: &Path,
    confirm: &dyn Confirm,
) -> crate::Result<FormatSummary> {
    let content = fs::read_to_string(input)?;
    let places: Vec<GooglePlace> = serde_json::from_str(&content)?;
    let mut summary = FormatSummary::default();
    let mut used = HashSet::new();

    tracing::info!("Formatting {} places from {}", places.len(), input.display());

    for (index, raw) in places.iter().enumerate() {
        if !raw.is_operational() {
            tracing::info!(
                "Skipping {}: {}",
                raw.display_text().unwrap_or("NO NAME FOUND"),
                raw.business_status.as_deref().unwrap_or("UNKNOWN")
            );
            summary.not_operational += 1;
            continue;
        }

        let formatted = format_place(raw);
        if !formatted.is_complete() {
            let prompt = format!(
                "Place {} is missing {}. Save it anyway?",
                raw.display_text().unwrap_or("NO NAME FOUND"),
                formatted.missing_fields.join(", ")
            );
            if !confirm.confirm(&prompt) {
                summary.declined += 1;
                continue;
            }
        }

        let mut stem = sanitize_file_name(&formatted.place.name);
        if stem.is_empty() {
            stem = format!("place_{}", index + 1);
        }
        let path = unique_path(output_dir, &stem, &used);

        if path.exists() {
            let prompt = format!("File {} exists. Replace it?", path.display());
            if !confirm.confirm(&prompt) {
                tracing::info!("Kept existing {}", path.display());
                summary.declined += 1;
                continue;
            }
        }

        used.insert(path.clone());
        if let Err(e) = write_entry(&path, &LocalCacheEntry::new(formatted.place)) {
            tracing::error!("Failed to save {}: {}", path.display(), e);
            summary.failed += 1;
            continue;
        }
        tracing::info!("Saved {}", path.display());
        summary.written.push(path);
    }

    Ok(summary)
}
