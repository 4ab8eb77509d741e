//! API Routes
//!
//! Configures the Axum router for the dev backend.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::*;

/// Creates the router: the REST contract under `/api` plus `GET /health`.
///
/// # Middleware
/// - CORS: Allows any origin, so a device or simulator on the LAN can call it
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: BackendState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/logs/recent", get(recent_logs_handler))
        .route("/item", post(create_item_handler))
        .route("/item/id/:id", get(item_by_id_handler))
        .route(
            "/item/:barcode",
            get(item_by_barcode_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        )
        .route("/items/search", get(search_handler))
        .route("/square/status", get(square_status_handler))
        .route(
            "/categories",
            get(categories_handler).post(add_category_handler),
        )
        .route(
            "/categories/:name",
            axum::routing::delete(delete_category_handler),
        )
        .route("/audit", get(audit_handler))
        .route("/audit/export", get(audit_export_handler))
        .route(
            "/print/settings",
            get(print_settings_handler).post(save_print_settings_handler),
        )
        .route("/print/label/:id", post(print_label_handler));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
