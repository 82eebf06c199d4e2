//! HTTP page fetcher
//!
//! This module handles every page request made during a crawl:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests that follow redirects
//! - Content-Type checks before parsing
//! - Turning every failure into an empty page so a crawl never aborts

use crate::config::CrawlerConfig;
use crate::crawler::parser::parse_page;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Result of fetching one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Visible page text, possibly empty
    pub text: String,

    /// Same-site links discovered on the page, in first-seen order
    pub links: Vec<String>,
}

impl PageResult {
    /// An empty result, used whenever a fetch fails
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Per-page fetch failures
///
/// These never leave the fetcher: they are logged and the page contributes
/// empty content.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl { url: String, source: url::ParseError },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },
}

/// Retrieves one page and reduces it to text and links
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`; failures yield [`PageResult::empty`]
    async fn fetch(&self, url: &str) -> PageResult;
}

/// Builds an HTTP client for page fetches
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.request_timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Fetches a page, surfacing the failure reason
    ///
    /// # Request Flow
    ///
    /// 1. Send GET request, following up to 10 redirects
    /// 2. Reject non-success statuses
    /// 3. Reject non-HTML Content-Type (a missing header is accepted)
    /// 4. Parse the body against the final, post-redirect URL
    pub async fn try_fetch(&self, url: &str) -> Result<PageResult, FetchError> {
        let request_url = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        if final_url.as_str() != url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("html") {
                return Err(FetchError::ContentMismatch {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        let parsed = parse_page(&body, &final_url);
        Ok(PageResult {
            text: parsed.text,
            links: parsed.links,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> PageResult {
        match self.try_fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url = %url, "Page fetch failed: {}", e);
                PageResult::empty()
            }
        }
    }
}

/// Maps a reqwest error to a fetch error
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}
