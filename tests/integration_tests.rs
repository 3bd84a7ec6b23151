//! Integration tests using mock HTTP server
//!
//! Tests the full flow: config → HTTP requests following Next_Page → stored objects

use chrono::NaiveDate;
use natstat_ingest::http::HttpClient;
use natstat_ingest::output::{BlobPageSink, CloudDestination};
use natstat_ingest::pagination::{Paginator, StopReason};
use natstat_ingest::{ErrorKind, IngestConfig, IngestEngine};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn config_for(server: &MockServer, destination: &str) -> IngestConfig {
    IngestConfig {
        api_key: "abc".to_string(),
        base_url: format!("{}/v1/x/", server.uri()),
        start: "2010-10-26".to_string(),
        max: 1000,
        destination: destination.to_string(),
        ..Default::default()
    }
}

fn page_body(page: u32, total: u32, next: Option<String>) -> Value {
    json!({
        "meta": {"Page": page.to_string(), "Total_Pages": total.to_string(), "Next_Page": next},
        "performances": {
            "performance": {"player": "Someone", "pts": page * 10}
        }
    })
}

/// Mounts a three-page chain; pages 2 and 3 are reached only through Next_Page
async fn mount_three_pages(server: &MockServer, page3_expected: u64) {
    let next = |n: u32| Some(format!("{}/v1/x/?key=abc&page={n}", server.uri()));

    Mock::given(method("GET"))
        .and(path("/v1/x/"))
        .and(query_param("key", "abc"))
        .and(query_param("format", "json"))
        .and(query_param("start", "2010-10-26"))
        .and(query_param("max", "1000"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 3, next(2))))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/x/"))
        .and(query_param("page", "2"))
        .and(query_param_is_missing("start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(2, 3, next(3))))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/x/"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(3, 3, None)))
        .expect(page3_expected)
        .mount(server)
        .await;
}

// ============================================================================
// Full Run Tests
// ============================================================================

#[tokio::test]
async fn test_three_page_run_stores_three_objects() {
    let server = MockServer::start().await;
    mount_three_pages(&server, 1).await;

    let engine = IngestEngine::new(config_for(&server, "memory://"))
        .unwrap()
        .with_run_date(run_date());
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.stop_reason, StopReason::LastPage);

    let keys = engine.destination().list().await.unwrap();
    assert_eq!(
        keys,
        vec![
            "playerperfs/2024-01-01-00001-of-00003.json",
            "playerperfs/2024-01-01-00002-of-00003.json",
            "playerperfs/2024-01-01-00003-of-00003.json",
        ]
    );

    // Each object holds the full body of its page
    for (i, key) in keys.iter().enumerate() {
        let page = (i + 1) as u32;
        let stored = engine.destination().read(key).await.unwrap();
        let body: Value = serde_json::from_slice(&stored).unwrap();
        let next = (page < 3).then(|| format!("{}/v1/x/?key=abc&page={}", server.uri(), page + 1));
        assert_eq!(body, page_body(page, 3, next));
    }
}

#[tokio::test]
async fn test_single_page_run_fetches_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/x/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"Page": 1, "Total_Pages": 1, "Next_Page": null},
            "performances": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = IngestEngine::new(config_for(&server, "memory://"))
        .unwrap()
        .with_run_date(run_date());
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(
        engine.destination().list().await.unwrap(),
        vec!["playerperfs/2024-01-01-00001-of-00001.json"]
    );
}

#[tokio::test]
async fn test_run_into_local_directory() {
    let server = MockServer::start().await;
    mount_three_pages(&server, 1).await;
    let dir = tempfile::tempdir().unwrap();

    let engine = IngestEngine::new(config_for(&server, dir.path().to_str().unwrap()))
        .unwrap()
        .with_run_date(run_date());
    engine.run().await.unwrap();

    for page in 1..=3 {
        let file = dir
            .path()
            .join("playerperfs")
            .join(format!("2024-01-01-0000{page}-of-00003.json"));
        assert!(file.exists(), "missing {}", file.display());
    }
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_storage_failure_on_page_two_stops_run() {
    let server = MockServer::start().await;
    mount_three_pages(&server, 0).await;
    let dir = tempfile::tempdir().unwrap();

    // A directory where page 2's object should go makes that write fail
    std::fs::create_dir_all(
        dir.path()
            .join("playerperfs")
            .join("2024-01-01-00002-of-00003.json")
            .join("blocker"),
    )
    .unwrap();

    let destination = CloudDestination::parse(dir.path().to_str().unwrap()).unwrap();
    let sink = BlobPageSink::new(destination, "playerperfs", run_date());
    let paginator = Paginator::new(HttpClient::new().unwrap(), sink);

    let config = config_for(&server, "unused");
    let err = paginator
        .run(&config.base_url, &config.fixed_params())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StorageWrite);
    assert!(dir
        .path()
        .join("playerperfs")
        .join("2024-01-01-00001-of-00003.json")
        .is_file());
    // page 3 mock expects zero calls; verified when the server drops
}

#[tokio::test]
async fn test_missing_api_key_fails_before_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = IngestConfig {
        api_key: String::new(),
        ..config_for(&server, "memory://")
    };
    let err = IngestEngine::new(config).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("NATSTAT_API_KEY"));
}

#[tokio::test]
async fn test_server_error_is_fatal_without_retry() {
    let server = MockServer::start().await;
    let next = format!("{}/v1/x/?page=2", server.uri());

    Mock::given(method("GET"))
        .and(query_param("start", "2010-10-26"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 3, Some(next))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let engine = IngestEngine::new(config_for(&server, "memory://"))
        .unwrap()
        .with_run_date(run_date());
    let err = engine.run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("page=2"));
    assert_eq!(
        engine.destination().list().await.unwrap(),
        vec!["playerperfs/2024-01-01-00001-of-00003.json"]
    );
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let engine = IngestEngine::new(config_for(&server, "memory://")).unwrap();
    let err = engine.run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert!(engine.destination().list().await.unwrap().is_empty());
}
