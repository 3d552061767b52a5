//! End-to-end behaviour of the circuit API against both store backends.
//!
//! Each test builds a fresh store and router, then drives requests through
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use circuit_api::circuit::slugify;
use circuit_api::http_server::{
    CircuitServer, CircuitState, ServerConfig, ServerMode, NOT_FOUND_MESSAGE,
};
use circuit_api::images::{ImageIntake, LocalBackend};
use circuit_api::store::{DocumentStore, MemoryStore, SharedStore};

// =============================================================================
// Harness
// =============================================================================

struct Harness {
    router: Router,
    _temp: TempDir,
}

impl Harness {
    fn new(store: SharedStore, mode: ServerMode) -> Self {
        let temp = TempDir::new().unwrap();
        let config = ServerConfig {
            mode,
            upload_dir: temp.path().join("images"),
            ..ServerConfig::default()
        };
        let images = ImageIntake::new(
            LocalBackend::new(config.upload_dir.clone()),
            config.image_url_prefix.clone(),
        );
        let state = Arc::new(CircuitState::new(store, images, mode).with_opened_year_cap(2026));
        let router = CircuitServer::with_state(config, state).router();
        Self {
            router,
            _temp: temp,
        }
    }

    fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), ServerMode::ReadWrite)
    }

    fn seeded() -> Self {
        Self::new(Arc::new(MemoryStore::seeded()), ServerMode::ReadWrite)
    }

    fn document() -> Self {
        Self::new(
            Arc::new(DocumentStore::open_in_memory().unwrap()),
            ServerMode::ReadWrite,
        )
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, body).await;
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn count(&self) -> usize {
        let (_, list) = self.json("GET", "/api/circuits", None).await;
        list.as_array().unwrap().len()
    }
}

fn circuit_body(name: &str) -> Value {
    json!({
        "name": name,
        "location": "Montreal, Canada",
        "length_km": 4.361,
        "laps": 70,
        "drs_zones": 3,
        "opened": 1978
    })
}

fn id_path(record: &Value) -> String {
    match &record["id"] {
        Value::Number(n) => format!("/api/circuits/{}", n),
        Value::String(s) => format!("/api/circuits/{}", s),
        other => panic!("unexpected id: {}", other),
    }
}

// =============================================================================
// List and get
// =============================================================================

#[tokio::test]
async fn list_on_empty_store_is_empty_array() {
    let app = Harness::memory();
    let (status, body) = app.json("GET", "/api/circuits", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn seeded_store_lists_reference_circuits() {
    let app = Harness::seeded();
    let (status, body) = app.json("GET", "/api/circuits", None).await;
    assert_eq!(status, StatusCode::OK);

    let circuits = body.as_array().unwrap();
    assert_eq!(circuits.len(), 9);
    assert_eq!(circuits[0]["id"], json!(1));
    assert_eq!(circuits[0]["slug"], json!("melbourne"));
    assert_eq!(circuits[7]["name"], json!("Circuit de Monaco"));
}

#[tokio::test]
async fn get_unknown_id_is_404_with_literal_message() {
    let app = Harness::seeded();
    for uri in [
        "/api/circuits/999",
        "/api/circuits/abc",
        "/api/circuits/0",
        "/api/circuits/1abc",
    ] {
        let (status, body) = app.send("GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body, NOT_FOUND_MESSAGE.as_bytes(), "{}", uri);
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_returns_201_with_derived_fields() {
    let app = Harness::memory();
    let (status, body) = app
        .json("POST", "/api/circuits", Some(circuit_body("Circuit Gilles Villeneuve")))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["slug"], json!("circuit-gilles-villeneuve"));
    assert_eq!(body["image_path"], json!("/images/default-circuit.jpg"));
    assert_eq!(body["laps"], json!(70));
}

#[tokio::test]
async fn create_with_short_name_is_400_and_stores_nothing() {
    let app = Harness::memory();
    let body = json!({
        "name": "Ok",
        "location": "Somewhere",
        "length_km": 5.0,
        "laps": 50,
        "drs_zones": 2,
        "opened": 2020
    });

    let (status, message) = app.send("POST", "/api/circuits", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(message).unwrap(),
        "\"name\" length must be at least 3 characters long"
    );
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn client_cannot_set_slug_or_id() {
    let app = Harness::memory();
    let mut body = circuit_body("Hungaroring");
    body["slug"] = json!("custom");
    body["id"] = json!(77);

    let (status, created) = app.json("POST", "/api/circuits", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], json!("hungaroring"));
    assert_eq!(created["id"], json!(1));
}

#[tokio::test]
async fn slugs_from_api_are_url_safe() {
    let app = Harness::memory();
    for name in ["  Autódromo  Hermanos Rodríguez!! ", "Baku City Circuit", "Yas Marina (2009)"] {
        let (status, created) = app.json("POST", "/api/circuits", Some(circuit_body(name))).await;
        assert_eq!(status, StatusCode::CREATED);

        let slug = created["slug"].as_str().unwrap();
        assert_eq!(slug, slugify(name));
        assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
    }
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_replaces_fields_and_rederives_slug() {
    let app = Harness::seeded();
    let mut body = circuit_body("Albert Park Circuit");
    body["location"] = json!("Melbourne, Australia");

    let (status, updated) = app.json("PUT", "/api/circuits/1", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], json!(1));
    assert_eq!(updated["slug"], json!("albert-park-circuit"));
    assert_eq!(updated["image_path"], json!("/images/melbourne2.avif"));

    let (_, fetched) = app.json("GET", "/api/circuits/1", None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_with_invalid_body_changes_nothing() {
    let app = Harness::seeded();
    let (_, before) = app.json("GET", "/api/circuits/2", None).await;

    let mut body = circuit_body("Shanghai International Circuit");
    body["opened"] = json!(2030);
    let (status, message) = app.send("PUT", "/api/circuits/2", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(message).unwrap(),
        "\"opened\" must be less than or equal to 2026"
    );

    let (_, after) = app.json("GET", "/api/circuits/2", None).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn update_unknown_id_is_404_and_cardinality_unchanged() {
    let app = Harness::seeded();
    let (status, body) = app
        .send("PUT", "/api/circuits/404", Some(circuit_body("Nowhere Raceway")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, NOT_FOUND_MESSAGE.as_bytes());
    assert_eq!(app.count().await, 9);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_returns_removed_record_then_404() {
    let app = Harness::memory();
    let (_, created) = app
        .json("POST", "/api/circuits", Some(circuit_body("Losail International")))
        .await;
    let path = id_path(&created);

    let (status, removed) = app.json("DELETE", &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed, created);

    let (status, _) = app.send("GET", &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.send("DELETE", &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
    let app = Harness::seeded();
    app.send("DELETE", "/api/circuits/9", None).await;

    let (_, created) = app
        .json("POST", "/api/circuits", Some(circuit_body("Las Vegas Strip Circuit")))
        .await;
    assert_eq!(created["id"], json!(10));
}

// =============================================================================
// Document store backend
// =============================================================================

#[tokio::test]
async fn document_store_full_lifecycle() {
    let app = Harness::document();

    let (status, created) = app
        .json("POST", "/api/circuits", Some(circuit_body("Marina Bay Street Circuit")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_string());
    let path = id_path(&created);

    let (status, fetched) = app.json("GET", &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = app
        .json("PUT", &path, Some(circuit_body("Marina Bay")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], json!("marina-bay"));
    assert_eq!(updated["id"], created["id"]);

    let (status, removed) = app.json("DELETE", &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed, updated);
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn document_store_unknown_ids_are_404() {
    let app = Harness::document();
    let (status, body) = app.send("GET", "/api/circuits/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, NOT_FOUND_MESSAGE.as_bytes());

    let (status, _) = app
        .send("PUT", "/api/circuits/missing", Some(circuit_body("Nowhere Raceway")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Read-only mode
// =============================================================================

#[tokio::test]
async fn read_only_mode_serves_reads_only() {
    let app = Harness::new(Arc::new(MemoryStore::seeded()), ServerMode::ReadOnly);

    let (status, _) = app.send("GET", "/api/circuits/3", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send("POST", "/api/circuits", Some(circuit_body("Sneaky Circuit")))
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = app
        .send("PUT", "/api/circuits/3", Some(circuit_body("Sneaky Circuit")))
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(app.count().await, 9);
}

// =============================================================================
// Upload limit
// =============================================================================

#[tokio::test]
async fn configured_upload_limit_rejects_large_bodies_with_413() {
    let temp = TempDir::new().unwrap();
    let config = ServerConfig {
        upload_dir: temp.path().join("images"),
        max_upload_bytes: 1024,
        ..ServerConfig::default()
    };
    let router = CircuitServer::with_store(config, Arc::new(MemoryStore::new())).router();

    let mut body = circuit_body("Circuit Paul Ricard");
    body["notes"] = json!("x".repeat(4096));
    let request = Request::builder()
        .method("POST")
        .uri("/api/circuits")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
