//! Integration Tests for the remote data source and API client
//!
//! Runs the dev backend on an ephemeral port and drives it through
//! `RemoteDataSource` over real HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::{json, Value};

use inventory_lookup::api::{create_router, BackendState};
use inventory_lookup::source::DataSources;
use inventory_lookup::{
    ApiClient, ApiError, AppStore, CacheTtls, DataSource, ErrorKind, InMemoryMockDataSource,
    Item, Outcome, RemoteDataSource,
};

// == Helper Functions ==

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_backend() -> SocketAddr {
    serve(create_router(BackendState::mock())).await
}

/// Backend stand-in with one slow route and one that omits `data`.
async fn spawn_stub() -> SocketAddr {
    async fn slow_logs() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Json(json!({"success": true, "data": []}))
    }

    async fn bare_success() -> Json<Value> {
        Json(json!({"success": true}))
    }

    let app = Router::new()
        .route("/api/logs/recent", get(slow_logs))
        .route("/api/square/status", get(bare_success))
        .route("/api/item/:id", delete(bare_success));
    serve(app).await
}

fn remote(addr: SocketAddr) -> RemoteDataSource {
    remote_with_timeout(addr, Duration::from_secs(5))
}

fn remote_with_timeout(addr: SocketAddr, timeout: Duration) -> RemoteDataSource {
    RemoteDataSource::new(&format!("http://{}/api", addr), timeout).unwrap()
}

fn client_for(source: RemoteDataSource) -> ApiClient {
    let sources = DataSources {
        primary: Arc::new(source),
        fallback: None,
    };
    ApiClient::new(sources, CacheTtls::default())
}

/// A port nothing listens on.
async fn dead_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn widget() -> Item {
    Item {
        name: "Widget".to_string(),
        price: Some(1.50),
        ..Item::default()
    }
}

// == Remote Data Source Tests ==

#[tokio::test]
async fn test_round_trip_create_then_fetch() {
    let source = remote(spawn_backend().await);

    let created = source.create_item(&widget()).await.unwrap();
    assert!(!created.is_new());
    assert!(created.timestamp.is_some());

    let fetched = source.item_by_id(&created.id).await.unwrap();
    assert_eq!(fetched.name, "Widget");
    assert_eq!(fetched.price, Some(1.50));
}

#[tokio::test]
async fn test_barcode_lookup_is_normalized() {
    let source = remote(spawn_backend().await);

    let item = source.item_by_barcode("223456789012").await.unwrap();
    assert_eq!(item.id, "2");
    assert_eq!(item.barcode.as_deref(), Some("223456789012"));
    assert_eq!(item.tax_label(), "+TAX (TOR)");
}

#[tokio::test]
async fn test_not_found_maps_to_not_found() {
    let source = remote(spawn_backend().await);

    let err = source.item_by_id("missing").await.unwrap_err();
    assert_eq!(err, ApiError::not_found("Item not found"));
}

#[tokio::test]
async fn test_validation_keeps_backend_message() {
    let source = remote(spawn_backend().await);

    let err = source.add_category("   ").await.unwrap_err();
    assert_eq!(err, ApiError::validation("Category name is required"));
}

#[tokio::test]
async fn test_update_twice_is_idempotent() {
    let source = remote(spawn_backend().await);
    let item = Item {
        name: "Renamed".to_string(),
        ..source.item_by_id("1").await.unwrap()
    };

    source.update_item(&item).await.unwrap();
    let once = source.item_by_id("1").await.unwrap();
    source.update_item(&item).await.unwrap();
    let twice = source.item_by_id("1").await.unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_category_names_are_encoded() {
    let source = remote(spawn_backend().await);

    source.add_category("Snacks & Candy/Gum").await.unwrap();
    let remaining = source.delete_category("Snacks & Candy/Gum").await.unwrap();
    assert!(!remaining.iter().any(|c| c.contains("Snacks")));
}

#[tokio::test]
async fn test_void_endpoints() {
    let source = remote(spawn_backend().await);

    source.print_label("1").await.unwrap();
    source.delete_item("1").await.unwrap();
    assert!(matches!(
        source.delete_item("1").await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let source = remote(dead_addr().await);

    let err = source.recent_logs().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let source = remote_with_timeout(spawn_stub().await, Duration::from_millis(200));

    let err = source.recent_logs().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err, ApiError::transport("Request timed out"));
}

#[tokio::test]
async fn test_success_without_data_is_transport_error() {
    let source = remote(spawn_stub().await);

    let err = source.square_status().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err, ApiError::transport("Response is missing data"));

    // Endpoints without a payload accept the bare envelope
    source.delete_item("5").await.unwrap();
}

#[tokio::test]
async fn test_client_surfaces_timeout_in_envelope() {
    let source = remote_with_timeout(spawn_stub().await, Duration::from_millis(200));

    let resp = client_for(source).get_recent_logs().await;
    assert!(!resp.success);
    assert_eq!(resp.kind, Some(ErrorKind::Transport));
    assert_eq!(resp.error_message(), "Request timed out");
}

// == Api Client Over HTTP ==

#[tokio::test]
async fn test_client_update_invalidates_barcode_cache() {
    let client = client_for(remote(spawn_backend().await));

    let mut item = client.get_item_by_barcode("123456789012").await.data.unwrap();
    item.price = Some(4.99);
    assert!(client.update_item(&item).await.success);

    let refreshed = client.get_item_by_barcode("123456789012").await.data.unwrap();
    assert_eq!(refreshed.price, Some(4.99));
}

#[tokio::test]
async fn test_client_status_failure_never_errors() {
    let client = client_for(remote(dead_addr().await));

    let resp = client.get_square_status(true).await;
    assert!(!resp.success);
    assert!(resp.error.is_some());
    assert!(!resp.data.unwrap().connected);
}

#[tokio::test]
async fn test_offline_fallback_serves_mock_results() {
    let sources = DataSources {
        primary: Arc::new(remote(dead_addr().await)),
        fallback: Some(Arc::new(InMemoryMockDataSource::new())),
    };
    let client = ApiClient::new(sources, CacheTtls::default());

    let logs = client.get_recent_logs().await;
    assert!(logs.success);
    assert_eq!(logs.data.unwrap().len(), 2);

    let status = client.get_square_status(true).await;
    assert!(status.data.unwrap().connected);
}

// == Store Over HTTP ==

#[tokio::test]
async fn test_store_scan_edit_save_flow() {
    let store = AppStore::new(client_for(remote(spawn_backend().await)));
    let scope = store.scope();

    store.fetch_recent_logs(&scope).await;
    assert_eq!(store.snapshot().scanned_items.len(), 2);

    store.search_barcode(&scope, "223456789012").await;
    store.edit_selected(|item| item.crv10 = true);
    let selected = store.snapshot().selected_item.unwrap();

    let saved = store.save_item(&scope, selected).await;
    assert!(saved.is_applied());

    let state = store.snapshot();
    assert!(state.selected_item.is_none());
    assert_eq!(state.scanned_items.len(), 2);
}

#[tokio::test]
async fn test_store_square_status_offline() {
    let store = AppStore::new(client_for(remote(dead_addr().await)));

    let outcome = store.check_square_status(&store.scope(), true).await;
    assert!(matches!(outcome, Outcome::Failed(_)));
    assert!(!store.snapshot().square_status.connected);
}
