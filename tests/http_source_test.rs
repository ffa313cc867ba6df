// Integration tests for `HttpSource` and `CatalogSession` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog::error::AppError;
use catalog::models::{ApiShape, Config, SortCriterion, ViewState};
use catalog::pipeline::{CatalogSession, LoadOutcome};
use catalog::services::{CreatureSource, HttpSource};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("{}/api/v1", server.uri());
    config.api.bulk_url = format!("{}/api/digimon", server.uri());
    config.api.timeout_secs = 5;
    config
}

async fn setup() -> (MockServer, HttpSource) {
    let server = MockServer::start().await;
    let source = HttpSource::with_client(&config_for(&server).api, reqwest::Client::new()).unwrap();
    (server, source)
}

fn detail(id: u32, name: &str, level: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "xAntibody": false,
        "images": [{ "href": format!("https://images.example/{name}.png"), "transparent": false }],
        "levels": [{ "id": 5, "level": level }],
    })
}

async fn mount_detail(server: &MockServer, id: u32, name: &str, level: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/digimon/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail(id, name, level)))
        .expect(1)
        .mount(server)
        .await;
}

// ── HttpSource ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_by_id_normalizes_detail() {
    let (server, source) = setup().await;
    mount_detail(&server, 1, "Agumon", "Rookie").await;

    let record = source.fetch_by_id(1).await.unwrap();

    assert_eq!(record.id, Some(1));
    assert_eq!(record.name, "Agumon");
    assert_eq!(record.current_level(), Some("Rookie"));
    assert_eq!(record.image.as_deref(), Some("https://images.example/Agumon.png"));
}

#[tokio::test]
async fn test_fetch_by_id_not_found() {
    let (server, source) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/digimon/9999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = source.fetch_by_id(9999).await.unwrap_err();

    assert!(matches!(err, AppError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_fetch_by_id_malformed_body() {
    let (server, source) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/digimon/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = source.fetch_by_id(3).await.unwrap_err();

    assert!(matches!(err, AppError::Json(_)));
}

#[tokio::test]
async fn test_fetch_all_reads_bulk_shape() {
    let (server, source) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/digimon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Koromon", "img": "https://images.example/koromon.jpg", "level": "In Training" },
            { "name": "Tsunomon", "img": "https://images.example/tsunomon.jpg", "level": "In Training" },
        ])))
        .mount(&server)
        .await;

    let records = source.fetch_all().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, None);
    assert_eq!(records[1].name, "Tsunomon");
}

#[tokio::test]
async fn test_search_uses_listing_endpoint() {
    let (server, source) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/digimon"))
        .and(query_param("name", "agu"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "id": 1, "name": "Agumon", "href": "https://api.example/digimon/1", "image": "https://images.example/Agumon.png" },
                { "id": 2, "name": "Agumon (2006 Anime Version)", "href": "https://api.example/digimon/2", "image": "https://images.example/Agumon2006.png" },
            ],
            "pageable": { "currentPage": 0, "elementsOnPage": 2, "totalElements": 2, "totalPages": 1 },
        })))
        .mount(&server)
        .await;

    let records = source.search("agu").await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].id, Some(2));
}

// ── CatalogSession ──────────────────────────────────────────────────

#[tokio::test]
async fn test_session_skips_failed_identifiers() {
    let server = MockServer::start().await;
    mount_detail(&server, 1, "Agumon", "Rookie").await;
    mount_detail(&server, 2, "Gabumon", "Rookie").await;
    mount_detail(&server, 3, "Greymon", "Champion").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/digimon/4"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.api.shape = ApiShape::PerId;
    config.api.max_id = 4;
    config.fetcher.batch_size = 5;
    let source = HttpSource::with_client(&config.api, reqwest::Client::new()).unwrap();
    let session = CatalogSession::new(source, &config);

    assert_eq!(session.load_initial().await.unwrap(), LoadOutcome::Loaded(3));
    assert_eq!(session.load_more().await, LoadOutcome::Exhausted);

    let rows = session.view(&ViewState::new("", SortCriterion::Level));
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Greymon", "Agumon", "Gabumon"]);
    assert!(session.fetcher().is_attempted(4));
}

#[tokio::test]
async fn test_session_bulk_failure_surfaces_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/digimon"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.api.shape = ApiShape::Bulk;
    let source = HttpSource::with_client(&config.api, reqwest::Client::new()).unwrap();
    let session = CatalogSession::new(source, &config);

    assert!(session.load_initial().await.is_err());
    let state = session.snapshot();
    assert!(state.last_error.unwrap().contains("503"));
    assert!(state.records.is_empty());
}
