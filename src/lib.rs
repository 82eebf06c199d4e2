//! Place-Enricher: crawl, extract and reconcile business places
//!
//! This crate takes place records fetched from a maps API, crawls each place's
//! website for raw text, turns that text into a typed record through a
//! schema-constrained extraction service, and reconciles the result against a
//! backend place store.

pub mod audit;
pub mod backend;
pub mod cache;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod places;
pub mod reconcile;
pub mod url;

use thiserror::Error;

/// Main error type for Place-Enricher operations
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] extract::ExtractionError),

    #[error("Reconciliation failed: {0}")]
    Reconcile(#[from] reconcile::ReconcileError),

    #[error("Place file {path} has no website to crawl")]
    MissingWebsite { path: String },

    #[error("No content collected from {url}")]
    NoContent { url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
}

/// Result type alias for Place-Enricher operations
pub type Result<T> = std::result::Result<T, EnrichError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{DailyHours, DayOfWeek, PlaceRecord};
pub use crate::url::{is_same_site, network_location};
