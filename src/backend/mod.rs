//! Backend place store access
//!
//! [`BackendGateway`] is the typed contract over the backend's CRUD
//! endpoints; [`HttpBackend`] implements it over HTTP. Every call has a
//! fixed timeout and no call is retried.

mod bounds;
mod gateway;
mod http;

pub use bounds::BoundingBox;
pub use gateway::{BackendError, BackendGateway, CreateResponse, StoredPlace, SubResourceKind};
pub use http::HttpBackend;

#[cfg(test)]
pub(crate) mod testing;
