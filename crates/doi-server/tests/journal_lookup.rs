//! End-to-end tests for `GET /journal` against an in-memory repository and
//! a stub registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use doi_server::doi_resolver::doi_core::{
    Doi, IdentifierKind, JournalId, JournalRecord, TypedIdentifier,
};
use doi_server::doi_resolver::{AdmissionGate, FetchError, JournalResolver, MetadataSource};
use doi_server::doi_store::MemoryRepository;
use doi_server::{AppState, ServerConfig, build_app};

const INTERNAL: &str = "http://fcrepo:8080/rest/journals/";
const PUBLIC: &str = "https://pass.example.edu/journals/";

struct StubRegistry {
    works: HashMap<String, Result<Value, FetchError>>,
}

#[async_trait]
impl MetadataSource for StubRegistry {
    async fn fetch_work(&self, doi: &Doi) -> Result<Value, FetchError> {
        self.works
            .get(doi.as_str())
            .cloned()
            .unwrap_or_else(|| Err(FetchError::NotFound(doi.to_string())))
    }
}

fn registry() -> StubRegistry {
    let mut works = HashMap::new();
    works.insert(
        "10.4137/cmc.s38446".to_string(),
        Ok(json!({
            "status": "ok",
            "message": {
                "DOI": "10.4137/cmc.s38446",
                "container-title": ["Clinical Medicine Insights: Cardiology"],
                "issn-type": [
                    {"value": "1179-5468", "type": "print"},
                    {"value": "1179-5468", "type": "electronic"}
                ],
                "ISSN": ["1179-5468"]
            }
        })),
    );
    works.insert(
        "10.1234/notitle".to_string(),
        Ok(json!({"message": {"container-title": [], "ISSN": []}})),
    );
    works.insert(
        "10.1234/down".to_string(),
        Err(FetchError::Unavailable("registry returned 503".to_string())),
    );
    works.insert(
        "10.1234/garbled".to_string(),
        Ok(json!({"message": ["not", "a", "work"]})),
    );
    works.insert(
        "10.1234/husbandry".to_string(),
        Ok(json!({"message": {
            "container-title": ["Advanced Research in Animal Husbandry"],
            "issn-type": [{"value": "0000-0002", "type": "electronic"}]
        }})),
    );
    StubRegistry { works }
}

struct TestApp {
    app: Router,
    repo: Arc<MemoryRepository>,
    gate: AdmissionGate,
}

fn test_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::with_base_uri(INTERNAL));
    let gate = AdmissionGate::new(Duration::from_secs(60));
    let resolver = JournalResolver::new(repo.clone(), Arc::new(registry()), gate.clone());
    let config = ServerConfig {
        repository_base_uri: INTERNAL.to_string(),
        public_base_uri: PUBLIC.to_string(),
        ..ServerConfig::default()
    };
    let app = build_app(AppState::new(resolver, config)).unwrap();
    TestApp { app, repo, gate }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value, Option<String>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body, request_id)
}

fn journal_uri(doi: &str) -> String {
    format!(
        "/journal?{}",
        serde_urlencoded::to_string([("doi", doi)]).unwrap()
    )
}

#[tokio::test]
async fn health_reports_ok() {
    let t = test_app();
    let (status, body, request_id) = get(&t.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    assert!(request_id.is_some());
}

#[tokio::test]
async fn resolves_and_externalizes_journal_id() {
    let t = test_app();

    let (status, body, _) = get(&t.app, &journal_uri("https://doi.org/10.4137/cmc.s38446")).await;
    assert_eq!(status, StatusCode::OK);

    let journal_id = body["journal-id"].as_str().unwrap();
    assert!(journal_id.starts_with(PUBLIC), "{journal_id}");
    assert_eq!(body["crossref"]["message"]["DOI"], "10.4137/cmc.s38446");

    // Second lookup reuses the same journal without writing.
    let (status, again, _) = get(&t.app, &journal_uri("10.4137/cmc.s38446")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["journal-id"], body["journal-id"]);
    assert_eq!(t.repo.write_count(), 1);
    assert!(t.gate.is_empty());
}

#[tokio::test]
async fn existing_title_is_kept() {
    let t = test_app();
    let existing = JournalRecord {
        id: JournalId::new(format!("{INTERNAL}fancy")),
        title: Some("Fancy Journal".to_string()),
        identifiers: vec![
            TypedIdentifier::new(IdentifierKind::Print, "0000-0001"),
            TypedIdentifier::new(IdentifierKind::Electronic, "0000-0002"),
        ]
        .into(),
    };
    t.repo.insert(existing).unwrap();

    let (status, body, _) = get(&t.app, &journal_uri("10.1234/husbandry")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["journal-id"], format!("{PUBLIC}fancy"));
    assert_eq!(t.repo.write_count(), 0);
}

#[tokio::test]
async fn error_outcomes_map_to_status_and_code() {
    let t = test_app();

    let cases = [
        ("/journal".to_string(), StatusCode::BAD_REQUEST, "INVALID_DOI"),
        (journal_uri("4137/cmc.s38446"), StatusCode::BAD_REQUEST, "INVALID_DOI"),
        (journal_uri("10.1212/abc.DEF"), StatusCode::NOT_FOUND, "NOT_FOUND_UPSTREAM"),
        (journal_uri("10.1234/down"), StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
        (journal_uri("10.1234/garbled"), StatusCode::BAD_GATEWAY, "METADATA_UNPARSABLE"),
        (
            journal_uri("10.1234/notitle"),
            StatusCode::UNPROCESSABLE_ENTITY,
            "INSUFFICIENT_INFORMATION",
        ),
    ];

    for (uri, expected_status, expected_code) in cases {
        let (status, body, _) = get(&t.app, &uri).await;
        assert_eq!(status, expected_status, "{uri}");
        assert_eq!(body["error"]["code"], expected_code, "{uri}");
        assert!(body["error"]["message"].is_string());
    }
    assert_eq!(t.repo.write_count(), 0);
}

#[tokio::test]
async fn concurrent_lookup_is_rejected_with_429() {
    let t = test_app();
    let _lease = t.gate.try_acquire("10.4137/cmc.s38446").unwrap();

    let (status, body, _) = get(&t.app, &journal_uri("http://dx.doi.org/10.4137/cmc.s38446")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "ALREADY_IN_PROGRESS");
    assert!(t.repo.is_empty());
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let t = test_app();
    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
