//! Turns aggregated site text into a validated place record

use crate::extract::client::StructuredCompletion;
use crate::extract::schema::{place_json_schema, SCHEMA_DESCRIPTION};
use crate::extract::ExtractionError;
use crate::model::PlaceRecord;
use serde_json::Value;

/// Schema-constrained extractor
pub struct SchemaExtractor<C: StructuredCompletion> {
    service: C,
}

impl<C: StructuredCompletion> SchemaExtractor<C> {
    pub fn new(service: C) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &C {
        &self.service
    }

    /// Extracts a place record from rendered crawl text
    ///
    /// The caller overlays id and coordinates from the source record.
    pub async fn extract(&self, aggregated_text: &str) -> Result<PlaceRecord, ExtractionError> {
        let raw = self
            .service
            .complete_structured(SCHEMA_DESCRIPTION, aggregated_text, place_json_schema())
            .await?;

        let place = parse_place(&raw)?;
        tracing::info!(name = %place.name, "Extracted place record");
        Ok(place)
    }
}

/// Parses and validates raw service output
///
/// # Validation Steps
///
/// 1. The text must be JSON
/// 2. The JSON must be an object
/// 3. The object must deserialize into [`PlaceRecord`] with no unknown fields
/// 4. Every hours entry must be in range
pub fn parse_place(raw: &str) -> Result<PlaceRecord, ExtractionError> {
    let value: Value = serde_json::from_str(raw).map_err(ExtractionError::InvalidJson)?;

    if !value.is_object() {
        return Err(ExtractionError::NotAnObject {
            found: json_kind(&value),
        });
    }

    let place: PlaceRecord = serde_json::from_value(value).map_err(ExtractionError::Schema)?;
    place.validate()?;
    Ok(place)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
