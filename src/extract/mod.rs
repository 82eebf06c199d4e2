//! Schema-constrained extraction of place records
//!
//! Aggregated site text goes to a structured-completion service together
//! with a strict JSON schema. The reply is parsed and validated into a
//! [`PlaceRecord`](crate::model::PlaceRecord) before anything else sees it.

mod client;
mod extractor;
mod schema;

pub use client::{OpenAiClient, StructuredCompletion};
pub use extractor::{parse_place, SchemaExtractor};
pub use schema::{place_json_schema, SCHEMA_DESCRIPTION, SCHEMA_NAME};

use crate::model::HoursError;
use thiserror::Error;

/// Failures that end extraction for the current place
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Extraction service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Extraction service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Extraction service returned no content")]
    EmptyResponse,

    #[error("Output is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Output is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },

    #[error("Output does not match the place schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("Output has invalid hours: {0}")]
    Hours(#[from] HoursError),
}
