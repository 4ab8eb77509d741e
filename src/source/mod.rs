//! Data Source Module
//!
//! The capability the API client is built on. Two implementations exist:
//! [`RemoteDataSource`] for the REST backend and [`InMemoryMockDataSource`]
//! for offline and development use. One is chosen at startup and injected.

mod mock;
mod remote;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{Config, DataSourceKind};
use crate::error::Result;
use crate::models::{AuditEntry, AuditQuery, Item, PrintSettings, ScanLogItem, SquareStatus};

pub use mock::{synthesize_item, InMemoryMockDataSource};
pub use remote::RemoteDataSource;

/// Backend operations. Inputs are assumed validated by the caller; errors use
/// the shared [`ApiError`](crate::error::ApiError) taxonomy.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn recent_logs(&self) -> Result<Vec<ScanLogItem>>;

    async fn item_by_barcode(&self, barcode: &str) -> Result<Item>;

    async fn item_by_id(&self, id: &str) -> Result<Item>;

    async fn search_items(&self, query: &str) -> Result<Vec<Item>>;

    async fn create_item(&self, item: &Item) -> Result<Item>;

    async fn update_item(&self, item: &Item) -> Result<Item>;

    async fn delete_item(&self, id: &str) -> Result<()>;

    async fn square_status(&self) -> Result<SquareStatus>;

    async fn categories(&self) -> Result<Vec<String>>;

    async fn add_category(&self, name: &str) -> Result<Vec<String>>;

    async fn delete_category(&self, name: &str) -> Result<Vec<String>>;

    async fn audit_logs(&self, query: AuditQuery) -> Result<Vec<AuditEntry>>;

    async fn export_audit_logs(&self) -> Result<String>;

    async fn print_settings(&self) -> Result<PrintSettings>;

    async fn save_print_settings(&self, settings: &PrintSettings) -> Result<PrintSettings>;

    async fn print_label(&self, item_id: &str) -> Result<()>;
}

/// Primary data source plus the optional offline fallback.
pub struct DataSources {
    pub primary: Arc<dyn DataSource>,
    pub fallback: Option<Arc<dyn DataSource>>,
}

/// Builds the data sources selected by configuration.
///
/// In mock mode the mock catalog is the primary source and no fallback is
/// needed. In remote mode the fallback, when enabled, is a fresh mock catalog.
pub fn from_config(config: &Config) -> Result<DataSources> {
    let sources = match config.data_source {
        DataSourceKind::Mock => DataSources {
            primary: Arc::new(InMemoryMockDataSource::new()),
            fallback: None,
        },
        DataSourceKind::Remote => {
            let remote = RemoteDataSource::new(&config.api_base_url, config.request_timeout())?;
            let fallback: Option<Arc<dyn DataSource>> = if config.offline_fallback {
                Some(Arc::new(InMemoryMockDataSource::new()))
            } else {
                None
            };
            DataSources {
                primary: Arc::new(remote),
                fallback,
            }
        }
    };

    info!(
        "Data source: {} (offline fallback: {})",
        sources.primary.name(),
        sources.fallback.is_some()
    );
    Ok(sources)
}
