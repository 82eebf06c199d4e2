//! reqwest implementation of the backend gateway

use crate::backend::bounds::BoundingBox;
use crate::backend::gateway::{
    BackendError, BackendGateway, CreateResponse, StoredPlace, SubResourceKind,
};
use crate::config::BackendConfig;
use crate::model::PlaceRecord;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the backend place store
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend client with the configured timeout on every call
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn places_url(&self) -> String {
        format!("{}/api/places", self.base_url)
    }

    fn place_url(&self, id: i64) -> String {
        format!("{}/api/places/{}", self.base_url, id)
    }
}

/// Fails on any non-2xx answer, keeping the body for the report
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Reads `id` from a create response; numeric strings are accepted
fn assigned_id(body: &Value) -> Option<i64> {
    match body.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl BackendGateway for HttpBackend {
    async fn get_by_id(&self, id: i64) -> Result<StoredPlace, BackendError> {
        let response = self.client.get(self.place_url(id)).send().await?;
        decode_body(check_status(response).await?).await
    }

    async fn get_by_bounds(&self, bounds: &BoundingBox) -> Result<Vec<StoredPlace>, BackendError> {
        tracing::debug!(bounds = %bounds.to_query(), "Querying places in bounds");
        let response = self
            .client
            .get(self.places_url())
            .query(&[("bounds", bounds.to_query())])
            .send()
            .await?;
        decode_body(check_status(response).await?).await
    }

    async fn create(&self, place: &PlaceRecord) -> Result<CreateResponse, BackendError> {
        let response = self
            .client
            .post(self.places_url())
            .json(place)
            .send()
            .await?;
        let response = check_status(response).await?;
        let status = response.status().as_u16();

        let body: Value = decode_body(response).await?;
        let id = assigned_id(&body).ok_or(BackendError::MissingId { status })?;
        Ok(CreateResponse { status, id })
    }

    async fn update(&self, id: i64, place: &PlaceRecord) -> Result<u16, BackendError> {
        let response = self
            .client
            .put(self.place_url(id))
            .json(place)
            .send()
            .await?;
        Ok(check_status(response).await?.status().as_u16())
    }

    async fn delete(&self, id: i64) -> Result<u16, BackendError> {
        let response = self.client.delete(self.place_url(id)).send().await?;
        Ok(check_status(response).await?.status().as_u16())
    }

    async fn create_sub_resource(
        &self,
        place_id: i64,
        kind: SubResourceKind,
        data: &Value,
    ) -> Result<u16, BackendError> {
        let url = format!("{}/{}", self.place_url(place_id), kind.path_segment());
        let response = self.client.post(url).json(data).send().await?;
        Ok(check_status(response).await?.status().as_u16())
    }
}
