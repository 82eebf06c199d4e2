//! Crawler module for collecting a business website's text
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching that never fails the crawl
//! - HTML text and same-site link extraction
//! - The breadth-first frontier and the bounded site crawl

mod fetcher;
mod frontier;
mod parser;
mod site;

pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher, PageResult};
pub use frontier::CrawlFrontier;
pub use parser::{parse_page, ParsedPage};
pub use site::{AggregatedContent, SiteCrawler};
