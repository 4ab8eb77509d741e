//! Integration Tests for the dev backend
//!
//! Tests the full request/response cycle for each endpoint group, including
//! the envelope shape and error status codes.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use inventory_lookup::api::{create_router, BackendState};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(BackendState::mock())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends requests in order through one app and returns the last response.
async fn send_all(app: &Router, requests: Vec<Request<Body>>) -> (StatusCode, Value) {
    let mut last = None;
    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        last = Some((status, body_to_json(response.into_body()).await));
    }
    last.unwrap()
}

// == Item Endpoint Tests ==

#[tokio::test]
async fn test_barcode_lookup_returns_envelope() {
    let app = create_test_app();

    let (status, json) = send_all(&app, vec![get("/api/item/123456789012")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["name"], "Test Item 1");
    assert_eq!(json["data"]["taxRedondo"], true);
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_unknown_barcode_is_synthesized_once() {
    let app = create_test_app();

    let (_, first) = send_all(&app, vec![get("/api/item/000111222333")]).await;
    let (_, second) = send_all(&app, vec![get("/api/item/000111222333")]).await;

    assert_eq!(first["data"]["name"], "Item 000111222333");
    assert_eq!(first["data"]["sku"], "SKU000111");
    assert_eq!(first["data"]["id"], second["data"]["id"]);
}

#[tokio::test]
async fn test_item_by_id_not_found() {
    let app = create_test_app();

    let (status, json) = send_all(&app, vec![get("/api/item/id/missing")]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Item not found");
}

#[tokio::test]
async fn test_create_then_fetch() {
    let app = create_test_app();

    let (status, created) = send_all(
        &app,
        vec![json_request("POST", "/api/item", r#"{"name":"Widget","price":1.5}"#)],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("mock_"));

    let uri = format!("/api/item/id/{}", id);
    let (_, fetched) = send_all(&app, vec![get(&uri)]).await;
    assert_eq!(fetched["data"]["name"], "Widget");
    assert_eq!(fetched["data"]["price"], 1.5);
    assert_eq!(fetched["data"]["sellable"], true);
}

#[tokio::test]
async fn test_create_without_name_is_bad_request() {
    let app = create_test_app();

    let request = json_request("POST", "/api/item", r#"{"price":2.0}"#);
    let (status, json) = send_all(&app, vec![request]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Item name is required");
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = create_test_app();

    let (status, updated) = send_all(
        &app,
        vec![json_request("PUT", "/api/item/2", r#"{"name":"Cola","price":2.25}"#)],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["id"], "2");

    let (status, deleted) = send_all(
        &app,
        vec![Request::builder()
            .method("DELETE")
            .uri("/api/item/2")
            .body(Body::empty())
            .unwrap()],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, serde_json::json!({"success": true}));

    let (status, _) = send_all(&app, vec![get("/api/item/id/2")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search() {
    let app = create_test_app();

    let (_, json) = send_all(&app, vec![get("/api/items/search?q=test002")]).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, _) = send_all(&app, vec![get("/api/items/search?q=")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Logs & Status Tests ==

#[tokio::test]
async fn test_recent_logs() {
    let app = create_test_app();

    let (status, json) = send_all(&app, vec![get("/api/logs/recent")]).await;

    assert_eq!(status, StatusCode::OK);
    let logs = json["data"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].get("itemName").is_some());
}

#[tokio::test]
async fn test_square_status() {
    let app = create_test_app();

    let (_, json) = send_all(&app, vec![get("/api/square/status")]).await;

    assert_eq!(json["data"]["connected"], true);
    assert_eq!(json["data"]["environment"], "development");
    assert_eq!(json["data"]["hasItems"], true);
}

// == Category, Audit & Print Tests ==

#[tokio::test]
async fn test_category_lifecycle_is_audited() {
    let app = create_test_app();

    let request = json_request(
        "POST",
        "/api/categories",
        r#"{"category":"Snacks & Candy"}"#,
    );
    let (_, added) = send_all(&app, vec![request]).await;
    assert_eq!(added["data"].as_array().unwrap().len(), 3);

    let (status, _) = send_all(
        &app,
        vec![Request::builder()
            .method("DELETE")
            .uri("/api/categories/Snacks%20&%20Candy")
            .body(Body::empty())
            .unwrap()],
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, audit) = send_all(&app, vec![get("/api/audit?page=1&limit=10")]).await;
    let entries = audit["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "Category Deleted");

    let (_, export) = send_all(&app, vec![get("/api/audit/export")]).await;
    let csv = export["data"].as_str().unwrap();
    assert!(csv.starts_with("id,action,user,timestamp,details,itemId,itemName"));
}

#[tokio::test]
async fn test_audit_rejects_bad_paging() {
    let app = create_test_app();

    let (status, json) = send_all(&app, vec![get("/api/audit?page=0")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Page must be at least 1");
}

#[tokio::test]
async fn test_print_settings_and_label() {
    let app = create_test_app();

    let (_, defaults) = send_all(&app, vec![get("/api/print/settings")]).await;
    assert_eq!(defaults["data"]["printerName"], "EPSON TM-T20III");

    let (status, saved) = send_all(
        &app,
        vec![json_request(
            "POST",
            "/api/print/settings",
            r#"{"printerName":"Zebra","fontSize":10}"#,
        )],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["data"]["fontSize"], 10);

    let (status, _) = send_all(
        &app,
        vec![Request::builder()
            .method("POST")
            .uri("/api/print/label/1")
            .body(Body::empty())
            .unwrap()],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// == Health Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send_all(&app, vec![get("/health")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["source"], "mock");
    assert!(json.get("timestamp").is_some());
}
