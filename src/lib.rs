//! Inventory Lookup - barcode inventory client
//!
//! Looks up and edits catalog items by barcode through a REST backend, with a
//! TTL response cache, an optimistic state store and an in-memory mock
//! catalog for offline and development use.

pub mod api;
pub mod app;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod store;
pub mod tasks;

pub use app::App;
pub use client::{ApiClient, CacheTtls};
pub use config::{Config, DataSourceKind};
pub use error::{ApiError, ErrorKind};
pub use models::{ApiResponse, Item, ScanLogItem, SquareStatus};
pub use source::{DataSource, InMemoryMockDataSource, RemoteDataSource};
pub use store::{AppState, AppStore, Outcome, Scope};
pub use tasks::spawn_status_poller;
