//! HTML parser for extracting visible text and same-site links
//!
//! Text comes from content elements only (paragraphs, top-level headings,
//! list items and spans), in document order. Links are resolved against the
//! page's own URL and kept only when they stay on that page's site.

use crate::url::is_same_site;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose text is collected
const TEXT_ELEMENTS: &str = "p, h1, h2, h3, li, span";

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    /// Visible text, elements joined with single spaces
    pub text: String,

    /// Same-site absolute links, deduplicated in first-seen order
    pub links: Vec<String>,
}

/// Parses HTML content and extracts text and same-site links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags resolving to http(s) URLs on the page's own site
///
/// **Exclude:**
/// - In-page anchors (`#...`)
/// - `javascript:` pseudo-links
/// - Links whose network location differs from `page_url`
///
/// Links that merely contain a fragment (`/menu#drinks`) are returned; the
/// crawler decides whether to follow them.
///
/// # Example
///
/// ```
/// use place_enricher::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><body><h1>Kelly's</h1><p>Open late</p><a href="/menu">Menu</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_page(html, &page_url);
/// assert_eq!(parsed.text, "Kelly's Open late");
/// assert_eq!(parsed.links, vec!["https://example.com/menu".to_string()]);
/// ```
pub fn parse_page(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        text: extract_text(&document),
        links: extract_links(&document, page_url),
    }
}

/// Collects visible text from content elements in document order
fn extract_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse(TEXT_ELEMENTS) else {
        return String::new();
    };

    document
        .select(&selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Joins the stripped text nodes of one element with single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts same-site links from the document
fn extract_links(document: &Html, page_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_link(href, page_url) else {
            continue;
        };

        if !is_same_site(&resolved, page_url) {
            tracing::trace!("Dropping off-site link {} from {}", resolved, page_url);
            continue;
        }

        let link = resolved.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - in-page anchors and `javascript:` links
/// - invalid URLs
/// - non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    matches!(absolute_url.scheme(), "http" | "https").then_some(absolute_url)
}
