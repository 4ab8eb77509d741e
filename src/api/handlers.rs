//! API Handlers
//!
//! HTTP request handlers for the dev backend. Each one delegates to the
//! shared data source and answers with the `{ success, data?, error? }`
//! envelope; errors are rendered by `ApiError`'s `IntoResponse`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::models::{
    ApiResponse, AuditEntry, AuditQuery, CategoryRequest, Item, PrintSettings, ScanLogItem,
    SearchQuery, SquareStatus,
};
use crate::source::{DataSource, InMemoryMockDataSource};

/// Backend state shared across all handlers.
#[derive(Clone)]
pub struct BackendState {
    /// Catalog the backend serves
    pub source: Arc<dyn DataSource>,
}

impl BackendState {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    /// State over a freshly seeded mock catalog.
    pub fn mock() -> Self {
        Self::new(Arc::new(InMemoryMockDataSource::new()))
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Data source behind the backend
    pub source: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(source: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            source: source.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Items ==

/// Handler for GET /item/:barcode
///
/// Unknown barcodes are synthesized by the mock catalog.
pub async fn item_by_barcode_handler(
    State(state): State<BackendState>,
    Path(barcode): Path<String>,
) -> Result<Json<ApiResponse<Item>>> {
    let item = state.source.item_by_barcode(&barcode).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// Handler for GET /item/id/:id
pub async fn item_by_id_handler(
    State(state): State<BackendState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Item>>> {
    let item = state.source.item_by_id(&id).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// Handler for GET /items/search?q=
pub async fn search_handler(
    State(state): State<BackendState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Item>>>> {
    let items = state.source.search_items(&query.q).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Handler for POST /item
pub async fn create_item_handler(
    State(state): State<BackendState>,
    Json(item): Json<Item>,
) -> Result<Json<ApiResponse<Item>>> {
    let created = state.source.create_item(&item).await?;
    info!("Created item {} ({})", created.name, created.id);
    Ok(Json(ApiResponse::ok(created)))
}

/// Handler for PUT /item/:id
///
/// The id in the path wins over any id in the body.
pub async fn update_item_handler(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(item): Json<Item>,
) -> Result<Json<ApiResponse<Item>>> {
    let item = Item { id, ..item };
    let updated = state.source.update_item(&item).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// Handler for DELETE /item/:id
pub async fn delete_item_handler(
    State(state): State<BackendState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.source.delete_item(&id).await?;
    info!("Deleted item {}", id);
    Ok(Json(ApiResponse::done()))
}

// == Logs & Status ==

/// Handler for GET /logs/recent
pub async fn recent_logs_handler(
    State(state): State<BackendState>,
) -> Result<Json<ApiResponse<Vec<ScanLogItem>>>> {
    let logs = state.source.recent_logs().await?;
    Ok(Json(ApiResponse::ok(logs)))
}

/// Handler for GET /square/status
pub async fn square_status_handler(
    State(state): State<BackendState>,
) -> Result<Json<ApiResponse<SquareStatus>>> {
    let status = state.source.square_status().await?;
    Ok(Json(ApiResponse::ok(status)))
}

// == Categories ==

/// Handler for GET /categories
pub async fn categories_handler(
    State(state): State<BackendState>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let categories = state.source.categories().await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// Handler for POST /categories
pub async fn add_category_handler(
    State(state): State<BackendState>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let name = req.validated()?;
    let categories = state.source.add_category(name).await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// Handler for DELETE /categories/:name
pub async fn delete_category_handler(
    State(state): State<BackendState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let categories = state.source.delete_category(&name).await?;
    Ok(Json(ApiResponse::ok(categories)))
}

// == Audit ==

/// Handler for GET /audit?page=&limit=
pub async fn audit_handler(
    State(state): State<BackendState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<ApiResponse<Vec<AuditEntry>>>> {
    let entries = state.source.audit_logs(query).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// Handler for GET /audit/export
pub async fn audit_export_handler(
    State(state): State<BackendState>,
) -> Result<Json<ApiResponse<String>>> {
    let csv = state.source.export_audit_logs().await?;
    Ok(Json(ApiResponse::ok(csv)))
}

// == Printing ==

/// Handler for GET /print/settings
pub async fn print_settings_handler(
    State(state): State<BackendState>,
) -> Result<Json<ApiResponse<PrintSettings>>> {
    let settings = state.source.print_settings().await?;
    Ok(Json(ApiResponse::ok(settings)))
}

/// Handler for POST /print/settings
pub async fn save_print_settings_handler(
    State(state): State<BackendState>,
    Json(settings): Json<PrintSettings>,
) -> Result<Json<ApiResponse<PrintSettings>>> {
    let saved = state.source.save_print_settings(&settings).await?;
    Ok(Json(ApiResponse::ok(saved)))
}

/// Handler for POST /print/label/:id
pub async fn print_label_handler(
    State(state): State<BackendState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.source.print_label(&id).await?;
    Ok(Json(ApiResponse::done()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<BackendState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.source.name()))
}
