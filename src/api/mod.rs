//! API Module
//!
//! HTTP handlers and routing for the local dev backend.
//!
//! # Endpoints (under `/api`)
//! - `GET /logs/recent` - Recent scan log
//! - `GET /item/:barcode`, `GET /item/id/:id` - Item lookups
//! - `GET /items/search?q=` - Item search
//! - `POST /item`, `PUT /item/:id`, `DELETE /item/:id` - Item writes
//! - `GET /square/status` - Connection status
//! - `GET|POST /categories`, `DELETE /categories/:name` - Categories
//! - `GET /audit`, `GET /audit/export` - Audit log
//! - `GET|POST /print/settings`, `POST /print/label/:id` - Printing
//!
//! Plus `GET /health` at the root.

pub mod handlers;
pub mod routes;

pub use handlers::{BackendState, HealthResponse};
pub use routes::create_router;
