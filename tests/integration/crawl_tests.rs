//! Integration tests for the site crawler
//!
//! These tests use wiremock to serve small websites and run the real HTTP
//! fetcher against them end-to-end.

use place_enricher::config::CrawlerConfig;
use place_enricher::crawler::{FetchError, HttpFetcher, SiteCrawler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An HTML response with the right content type
fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

fn crawler() -> SiteCrawler<HttpFetcher> {
    let config = CrawlerConfig {
        request_timeout_secs: 5,
        ..CrawlerConfig::default()
    };
    SiteCrawler::new(HttpFetcher::new(&config).expect("Failed to build fetcher"))
}

#[tokio::test]
async fn test_crawl_stays_on_site() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r##"<html><body>
            <h1>Kelly's Pub</h1>
            <a href="/b">About</a>
            <a href="{}/c">Partner</a>
            <a href="/#section">Jump</a>
            <a href="#top">Top</a>
            </body></html>"##,
            other.uri()
        )))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(r#"<p>Open daily</p><a href="/">Home</a>"#))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .respond_with(html("<p>Elsewhere</p>"))
        .expect(0)
        .mount(&other)
        .await;

    let content = crawler().crawl(&format!("{}/", base), 3).await;

    assert_eq!(
        content.visited_urls(),
        vec![format!("{}/", base), format!("{}/b", base)]
    );
    assert_eq!(
        content.render(),
        format!("=== {b}/ ===\nKelly's Pub\n=== {b}/b ===\nOpen daily", b = base)
    );
}

#[tokio::test]
async fn test_budget_visits_in_breadth_first_order() {
    let site = MockServer::start().await;
    let pages = ["/", "/p1", "/p2", "/p3", "/p4"];

    for page in pages {
        let links: String = pages
            .iter()
            .filter(|p| **p != page)
            .map(|p| format!(r#"<a href="{}">{}</a>"#, p, p))
            .collect();
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html(format!("<p>{}</p>{}", page, links)))
            .mount(&site)
            .await;
    }

    let content = crawler().crawl(&format!("{}/", site.uri()), 2).await;

    assert_eq!(
        content.visited_urls(),
        vec![format!("{}/", site.uri()), format!("{}/p1", site.uri())]
    );
    let requests = site.received_requests().await.expect("Recording is enabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_failed_pages_do_not_stop_crawl() {
    let site = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<p>Home</p>
            <a href="/broken">Broken</a>
            <a href="/data.json">Data</a>
            <a href="/menu">Menu</a>"#,
        ))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a":1}"#, "application/json"))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/menu"))
        .respond_with(html("<ul><li>Tacos</li><li>Burgers</li></ul>"))
        .mount(&site)
        .await;

    let content = crawler().crawl(&format!("{}/", base), 10).await;

    assert_eq!(
        content.blocks,
        vec![
            (format!("{}/", base), "Home".to_string()),
            (format!("{}/broken", base), String::new()),
            (format!("{}/data.json", base), String::new()),
            (format!("{}/menu", base), "Tacos Burgers".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_redirect_narrows_crawl_to_final_host() {
    let entry = MockServer::start().await;
    let target = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/home", target.uri()).as_str()),
        )
        .mount(&entry)
        .await;

    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(html("<p>Should not be visited</p>"))
        .expect(0)
        .mount(&entry)
        .await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(html(format!(
            r#"<p>Welcome</p><a href="/about">About</a><a href="{}/other">Old site</a>"#,
            entry.uri()
        )))
        .mount(&target)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>Since 1998</p>"))
        .mount(&target)
        .await;

    let content = crawler().crawl(&format!("{}/", entry.uri()), 10).await;

    assert_eq!(
        content.blocks,
        vec![
            (format!("{}/", entry.uri()), "Welcome".to_string()),
            (format!("{}/about", target.uri()), "Since 1998".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_fetch_reports_status_errors() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let fetcher = HttpFetcher::new(&CrawlerConfig::default()).expect("Failed to build fetcher");
    let result = fetcher.try_fetch(&format!("{}/missing", site.uri())).await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_unreachable_site_yields_no_text() {
    // Nothing listens on the discard port
    let content = crawler().crawl("http://127.0.0.1:9/", 10).await;

    assert_eq!(content.len(), 1);
    assert!(!content.has_text());
}
