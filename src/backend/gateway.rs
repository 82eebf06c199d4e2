//! Backend place store contract

use crate::backend::bounds::BoundingBox;
use crate::model::PlaceRecord;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Backend call failures; none are retried
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unparseable backend response: {0}")]
    Decode(String),

    #[error("Backend create returned HTTP {status} without an id")]
    MissingId { status: u16 },
}

impl BackendError {
    /// HTTP status carried by the error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Transport(e) => e.status().map(|s| s.as_u16()),
            BackendError::Status { status, .. } | BackendError::MissingId { status } => {
                Some(*status)
            }
            BackendError::Decode(_) => None,
        }
    }

    /// Returns true for a 404 answer
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// A place as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlace {
    pub id: i64,

    /// Empty when the backend has no name, including an explicit `null`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Every other field, kept as returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Result of a successful create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateResponse {
    pub status: u16,
    pub id: i64,
}

/// Collections nested under a place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubResourceKind {
    Promotions,
}

impl SubResourceKind {
    /// Path segment under `/api/places/{id}/`
    pub fn path_segment(&self) -> &'static str {
        match self {
            SubResourceKind::Promotions => "promotions",
        }
    }
}

/// Typed CRUD access to the backend place store
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<StoredPlace, BackendError>;

    async fn get_by_bounds(&self, bounds: &BoundingBox) -> Result<Vec<StoredPlace>, BackendError>;

    async fn create(&self, place: &PlaceRecord) -> Result<CreateResponse, BackendError>;

    async fn update(&self, id: i64, place: &PlaceRecord) -> Result<u16, BackendError>;

    async fn delete(&self, id: i64) -> Result<u16, BackendError>;

    async fn create_sub_resource(
        &self,
        place_id: i64,
        kind: SubResourceKind,
        data: &Value,
    ) -> Result<u16, BackendError>;
}
