//! Tests for the ingest engine

use super::*;
use crate::error::ErrorKind;
use crate::pagination::StopReason;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> IngestConfig {
    IngestConfig {
        api_key: "abc".to_string(),
        base_url: format!("{}/v1/playerperfs/NBA/", server.uri()),
        destination: "memory://".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_new_rejects_missing_key() {
    let err = IngestEngine::new(IngestConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_new_defaults_run_date_to_today() {
    let config = IngestConfig {
        api_key: "abc".to_string(),
        destination: "memory://".to_string(),
        ..Default::default()
    };
    let engine = IngestEngine::new(config).unwrap();
    assert_eq!(engine.run_date(), Utc::now().date_naive());
    assert_eq!(engine.destination().scheme(), "memory");
}

#[tokio::test]
async fn test_run_stores_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/playerperfs/NBA/"))
        .and(query_param("key", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"Page": "1", "Total_Pages": "1"},
            "performances": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let engine = IngestEngine::new(config_for(&server))
        .unwrap()
        .with_run_date(date);

    let stats = engine.run().await.unwrap();

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.stop_reason, StopReason::LastPage);
    assert_eq!(
        engine.destination().list().await.unwrap(),
        vec!["playerperfs/2024-03-09-00001-of-00001.json"]
    );
}

#[tokio::test]
async fn test_check_stores_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"Page": 1, "Total_Pages": 40, "Next_Page": format!("{}/next", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = IngestEngine::new(config_for(&server)).unwrap();
    let (meta, status) = engine.check().await.unwrap();

    assert_eq!(status, 200);
    assert_eq!(meta.total_pages, 40);
    assert!(engine.destination().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_custom_key_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"Page": 1, "Total_Pages": 1}
        })))
        .mount(&server)
        .await;

    let config = IngestConfig {
        key_prefix: "raw/playerperfs".to_string(),
        ..config_for(&server)
    };
    let engine = IngestEngine::new(config)
        .unwrap()
        .with_run_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    engine.run().await.unwrap();

    assert_eq!(
        engine.destination().list().await.unwrap(),
        vec!["raw/playerperfs/2024-01-01-00001-of-00001.json"]
    );
}
