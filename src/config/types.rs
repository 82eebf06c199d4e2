use serde::Deserialize;

/// Default bounding-box half-width in degrees (roughly 110 m of latitude)
pub const DEFAULT_BOUNDS_EPSILON: f64 = 0.001;

/// Main configuration structure for Place-Enricher
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Site crawl configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages fetched per site
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_page_timeout")]
    pub request_timeout_secs: u64,

    /// User agent sent with page requests
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            request_timeout_secs: default_page_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Structured extraction service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(rename = "api-url", default = "default_extractor_url")]
    pub api_url: String,

    /// Model used for extraction
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Timeout for one extraction call (seconds)
    #[serde(rename = "timeout-secs", default = "default_extractor_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_url: default_extractor_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_extractor_timeout(),
        }
    }
}

/// Backend place store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, without the `/api` suffix
    #[serde(rename = "api-url", default = "default_backend_url")]
    pub api_url: String,

    /// Timeout for every backend call (seconds)
    #[serde(rename = "timeout-secs", default = "default_backend_timeout")]
    pub timeout_secs: u64,

    /// Half-width of the "nearby" bounding box in degrees
    #[serde(rename = "bounds-epsilon", default = "default_bounds_epsilon")]
    pub bounds_epsilon: f64,

    /// Post extracted promotions after a successful sync
    #[serde(rename = "publish-promotions", default)]
    pub publish_promotions: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_backend_url(),
            timeout_secs: default_backend_timeout(),
            bounds_epsilon: default_bounds_epsilon(),
            publish_promotions: false,
        }
    }
}

/// Output directories
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding formatted place files
    #[serde(rename = "cache-dir", default = "default_cache_dir")]
    pub cache_dir: String,

    /// Directory holding extracted place files
    #[serde(rename = "enriched-dir", default = "default_enriched_dir")]
    pub enriched_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            enriched_dir: default_enriched_dir(),
        }
    }
}

fn default_max_pages() -> usize {
    10
}

fn default_page_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("place-enricher/{}", env!("CARGO_PKG_VERSION"))
}

fn default_extractor_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_extractor_timeout() -> u64 {
    60
}

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_backend_timeout() -> u64 {
    10
}

fn default_bounds_epsilon() -> f64 {
    DEFAULT_BOUNDS_EPSILON
}

fn default_cache_dir() -> String {
    "output_nearbySearch_cleaned".to_string()
}

fn default_enriched_dir() -> String {
    "output_nearbySearch_ai_cleaned".to_string()
}
