//! Integration tests for the enrich and sync pipeline
//!
//! A wiremock server plays each external party: the business website, the
//! structured-extraction service and the backend place store.

use place_enricher::backend::HttpBackend;
use place_enricher::cache::{read_entry, write_entry, LocalCacheEntry};
use place_enricher::config::{BackendConfig, CrawlerConfig, ExtractorConfig};
use place_enricher::crawler::HttpFetcher;
use place_enricher::extract::OpenAiClient;
use place_enricher::output::PlaceStatus;
use place_enricher::pipeline::{AutoConfirm, Enricher, Pipeline, Syncer};
use place_enricher::reconcile::IdConflict;
use place_enricher::PlaceRecord;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDS: &str = "39.999,-87.001,40.001,-86.999";

fn extracted_place() -> Value {
    json!({
        "name": "Kelly's Pub",
        "street": "949 W Webster Ave",
        "city": "Chicago",
        "state_code": "IL",
        "zip": "60614",
        "latitude": null,
        "longitude": null,
        "hours": [
            { "day": "Monday", "open_hour": 0, "open_minute": null, "close_hour": 0, "close_minute": null }
        ],
        "amenity": "bar",
        "cuisine": ["Irish"],
        "price_level": "$",
        "rating": null,
        "description": "Neighborhood Irish pub",
        "phone": null,
        "email": null,
        "website": null,
        "profile_image_url": null,
        "image_urls": null,
        "primary_type": "bar",
        "secondary_types": null,
        "promotion_data": null,
        "menu_data": null,
        "event_data": null
    })
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200 }
    }))
}

async fn start_site() -> MockServer {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<h1>Kelly's Pub</h1><p>Open 24 hours, Monday</p>",
            "text/html",
        ))
        .mount(&site)
        .await;
    site
}

fn write_source(dir: &Path, file: &str, website: &str, id: Option<i64>) -> PathBuf {
    let path = dir.join("cleaned").join(file);
    let entry = LocalCacheEntry {
        id,
        place: PlaceRecord {
            name: "Kelly's Pub".to_string(),
            street: "949 W Webster Ave".to_string(),
            city: "Chicago".to_string(),
            state_code: "IL".to_string(),
            zip: "60614".to_string(),
            latitude: Some(40.0),
            longitude: Some(-87.0),
            website: Some(website.to_string()),
            ..PlaceRecord::default()
        },
    };
    write_entry(&path, &entry).expect("Failed to write source");
    path
}

fn pipeline(
    dir: &Path,
    openai: &MockServer,
    backend: &MockServer,
) -> Pipeline<HttpFetcher, OpenAiClient, HttpBackend> {
    let fetcher = HttpFetcher::new(&CrawlerConfig::default()).expect("Failed to build fetcher");
    let service = OpenAiClient::with_api_key(
        &ExtractorConfig {
            api_url: format!("{}/v1", openai.uri()),
            ..ExtractorConfig::default()
        },
        "sk-test",
    )
    .expect("Failed to build extraction client");
    let enricher = Enricher::new(
        fetcher,
        service,
        Box::new(AutoConfirm(true)),
        10,
        dir.join("enriched"),
    );

    let gateway = HttpBackend::new(&BackendConfig {
        api_url: backend.uri(),
        ..BackendConfig::default()
    })
    .expect("Failed to build backend client");

    Pipeline::new(enricher, Syncer::new(gateway, 0.001, false))
}

#[tokio::test]
async fn test_run_creates_new_place_and_stores_id() {
    let dir = TempDir::new().unwrap();
    let site = start_site().await;
    let openai = MockServer::start().await;
    let backend = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion(&extracted_place().to_string()))
        .expect(1)
        .mount(&openai)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/places"))
        .and(query_param("bounds", BOUNDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/places"))
        .and(body_partial_json(json!({
            "name": "Kelly's Pub",
            "latitude": 40.0,
            "longitude": -87.0,
            "amenity": "bar"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 77 })))
        .expect(1)
        .mount(&backend)
        .await;

    let source = write_source(dir.path(), "kellys_pub.json", &format!("{}/", site.uri()), None);
    let outcome = pipeline(dir.path(), &openai, &backend)
        .run(&source)
        .await
        .expect("Pipeline run failed");

    assert_eq!(outcome.status(), PlaceStatus::Created { id: 77 });

    let enriched = read_entry(&dir.path().join("enriched").join("kellys_pub_ai_cleaned.json"))
        .expect("Enriched file missing");
    assert_eq!(enriched.id, Some(77));
    assert_eq!(enriched.place.coordinates(), Some((40.0, -87.0)));
    assert_eq!(enriched.place.cuisine, Some(vec!["Irish".to_string()]));
}

#[tokio::test]
async fn test_run_prefers_backend_id_over_stale_local_id() {
    let dir = TempDir::new().unwrap();
    let site = start_site().await;
    let openai = MockServer::start().await;
    let backend = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion(&extracted_place().to_string()))
        .mount(&openai)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 9, "name": "Kelly's Pub", "latitude": 40.0, "longitude": -87.0 }
        ])))
        .mount(&backend)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/places/9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .expect(0)
        .mount(&backend)
        .await;

    let source = write_source(dir.path(), "kellys_pub.json", &format!("{}/", site.uri()), Some(5));
    let outcome = pipeline(dir.path(), &openai, &backend)
        .run(&source)
        .await
        .expect("Pipeline run failed");

    assert_eq!(
        outcome.status(),
        PlaceStatus::Updated {
            id: 9,
            conflict: Some(IdConflict {
                local_id: 5,
                backend_id: 9
            })
        }
    );
    let enriched = read_entry(&dir.path().join("enriched").join("kellys_pub_ai_cleaned.json"))
        .expect("Enriched file missing");
    assert_eq!(enriched.id, Some(9));
}

#[tokio::test]
async fn test_second_sync_updates_created_place() {
    let dir = TempDir::new().unwrap();
    let backend = MockServer::start().await;

    // The first lookup finds nothing; afterwards the created place is visible
    Mock::given(method("GET"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&backend)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 31, "name": "Kelly's Pub", "latitude": 40.0, "longitude": -87.0 }
        ])))
        .mount(&backend)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 31 })))
        .expect(1)
        .mount(&backend)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/places/31"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend)
        .await;

    let gateway = HttpBackend::new(&BackendConfig {
        api_url: backend.uri(),
        ..BackendConfig::default()
    })
    .unwrap();
    let syncer = Syncer::new(gateway, 0.001, false);
    let source = write_source(dir.path(), "kellys_pub.json", "http://unused.test/", None);

    let first = syncer.sync(&source).await.expect("First sync failed");
    let second = syncer.sync(&source).await.expect("Second sync failed");

    assert_eq!(first.status(), PlaceStatus::Created { id: 31 });
    assert_eq!(
        second.status(),
        PlaceStatus::Updated {
            id: 31,
            conflict: None
        }
    );
    assert_eq!(read_entry(&source).unwrap().id, Some(31));
}

#[tokio::test]
async fn test_batch_continues_after_extraction_failure() {
    let dir = TempDir::new().unwrap();
    let site = start_site().await;
    let openai = MockServer::start().await;
    let backend = MockServer::start().await;

    // First place gets prose instead of JSON, second gets a valid record
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion("Kelly's Pub is a bar in Chicago."))
        .up_to_n_times(1)
        .mount(&openai)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion(&extracted_place().to_string()))
        .mount(&openai)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 12 })))
        .expect(1)
        .mount(&backend)
        .await;

    let website = format!("{}/", site.uri());
    let first = write_source(dir.path(), "a_pub.json", &website, None);
    let second = write_source(dir.path(), "b_pub.json", &website, None);

    let report = pipeline(dir.path(), &openai, &backend)
        .run_all(&[first.clone(), second.clone()])
        .await;

    assert_eq!(report.places.len(), 2);
    assert!(report.places[0].status.is_failure());
    assert_eq!(report.places[1].status, PlaceStatus::Created { id: 12 });
    assert_eq!(report.failed(), 1);
    assert!(!dir.path().join("enriched").join("a_pub_ai_cleaned.json").exists());
}

#[tokio::test]
async fn test_backend_failure_leaves_cache_untouched() {
    let dir = TempDir::new().unwrap();
    let backend = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is down"))
        .mount(&backend)
        .await;

    let gateway = HttpBackend::new(&BackendConfig {
        api_url: backend.uri(),
        ..BackendConfig::default()
    })
    .unwrap();
    let syncer = Syncer::new(gateway, 0.001, false);
    let source = write_source(dir.path(), "kellys_pub.json", "http://unused.test/", None);
    let before = std::fs::read_to_string(&source).unwrap();

    let report = syncer.sync_all(&[source.clone()]).await;

    assert_eq!(report.failed(), 1);
    assert_eq!(std::fs::read_to_string(&source).unwrap(), before);
}
