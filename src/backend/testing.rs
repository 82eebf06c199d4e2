//! In-memory gateway for unit tests

use crate::backend::{
    BackendError, BackendGateway, BoundingBox, CreateResponse, StoredPlace, SubResourceKind,
};
use crate::model::PlaceRecord;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetById(i64),
    GetByBounds,
    Create(String),
    Update(i64),
    Delete(i64),
    SubResource(i64, SubResourceKind, Value),
}

/// Records every call and serves an in-memory store
pub struct RecordingGateway {
    pub places: Mutex<Vec<StoredPlace>>,
    pub calls: Mutex<Vec<Call>>,
    pub next_id: Mutex<i64>,
    pub fail_create: bool,
    pub fail_update: bool,
    pub fail_sub_resource: bool,
    pub server_errors: HashSet<i64>,
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self {
            places: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(100),
            fail_create: false,
            fail_update: false,
            fail_sub_resource: false,
            server_errors: HashSet::new(),
        }
    }
}

impl RecordingGateway {
    pub fn with_place(self, id: i64, name: &str, latitude: f64, longitude: f64) -> Self {
        self.places.lock().unwrap().push(StoredPlace {
            id,
            name: name.to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            extra: Map::new(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.places.lock().unwrap().iter().map(|p| p.id).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(status: u16) -> BackendError {
        BackendError::Status {
            status,
            body: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl BackendGateway for RecordingGateway {
    async fn get_by_id(&self, id: i64) -> Result<StoredPlace, BackendError> {
        self.record(Call::GetById(id));
        if self.server_errors.contains(&id) {
            return Err(Self::failure(500));
        }
        self.places
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Self::failure(404))
    }

    async fn get_by_bounds(&self, bounds: &BoundingBox) -> Result<Vec<StoredPlace>, BackendError> {
        self.record(Call::GetByBounds);
        Ok(self
            .places
            .lock()
            .unwrap()
            .iter()
            .filter(|p| match (p.latitude, p.longitude) {
                (Some(lat), Some(lng)) => bounds.contains(lat, lng),
                _ => false,
            })
            .cloned()
            .collect())
    }

    async fn create(&self, place: &PlaceRecord) -> Result<CreateResponse, BackendError> {
        self.record(Call::Create(place.name.clone()));
        if self.fail_create {
            return Err(Self::failure(500));
        }

        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        self.places.lock().unwrap().push(StoredPlace {
            id,
            name: place.name.clone(),
            latitude: place.latitude,
            longitude: place.longitude,
            extra: Map::new(),
        });
        Ok(CreateResponse { status: 201, id })
    }

    async fn update(&self, id: i64, place: &PlaceRecord) -> Result<u16, BackendError> {
        self.record(Call::Update(id));
        if self.fail_update {
            return Err(Self::failure(500));
        }

        let mut places = self.places.lock().unwrap();
        let stored = places
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::failure(404))?;
        stored.name = place.name.clone();
        stored.latitude = place.latitude;
        stored.longitude = place.longitude;
        Ok(200)
    }

    async fn delete(&self, id: i64) -> Result<u16, BackendError> {
        self.record(Call::Delete(id));
        self.places.lock().unwrap().retain(|p| p.id != id);
        Ok(204)
    }

    async fn create_sub_resource(
        &self,
        place_id: i64,
        kind: SubResourceKind,
        data: &Value,
    ) -> Result<u16, BackendError> {
        self.record(Call::SubResource(place_id, kind, data.clone()));
        if self.fail_sub_resource {
            return Err(Self::failure(422));
        }
        Ok(201)
    }
}
