//! Controllable data source for unit tests
//!
//! Wraps the mock catalog and counts every call. It can be switched offline
//! (every call fails with a transport error) and slowed down to exercise
//! cancellation.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{DataSource, InMemoryMockDataSource};
use crate::error::{ApiError, Result};
use crate::models::{AuditEntry, AuditQuery, Item, PrintSettings, ScanLogItem, SquareStatus};

#[derive(Debug, Default)]
pub struct FlakySource {
    pub inner: InMemoryMockDataSource,
    calls: AtomicUsize,
    offline: AtomicBool,
    delay_ms: AtomicU64,
}

impl FlakySource {
    pub fn new(inner: InMemoryMockDataSource) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        let source = Self::new(InMemoryMockDataSource::empty());
        source.set_offline(true);
        source
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of calls that reached this source.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn gate(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::transport("Network unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl DataSource for FlakySource {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn recent_logs(&self) -> Result<Vec<ScanLogItem>> {
        self.gate().await?;
        self.inner.recent_logs().await
    }

    async fn item_by_barcode(&self, barcode: &str) -> Result<Item> {
        self.gate().await?;
        self.inner.item_by_barcode(barcode).await
    }

    async fn item_by_id(&self, id: &str) -> Result<Item> {
        self.gate().await?;
        self.inner.item_by_id(id).await
    }

    async fn search_items(&self, query: &str) -> Result<Vec<Item>> {
        self.gate().await?;
        self.inner.search_items(query).await
    }

    async fn create_item(&self, item: &Item) -> Result<Item> {
        self.gate().await?;
        self.inner.create_item(item).await
    }

    async fn update_item(&self, item: &Item) -> Result<Item> {
        self.gate().await?;
        self.inner.update_item(item).await
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        self.gate().await?;
        self.inner.delete_item(id).await
    }

    async fn square_status(&self) -> Result<SquareStatus> {
        self.gate().await?;
        self.inner.square_status().await
    }

    async fn categories(&self) -> Result<Vec<String>> {
        self.gate().await?;
        self.inner.categories().await
    }

    async fn add_category(&self, name: &str) -> Result<Vec<String>> {
        self.gate().await?;
        self.inner.add_category(name).await
    }

    async fn delete_category(&self, name: &str) -> Result<Vec<String>> {
        self.gate().await?;
        self.inner.delete_category(name).await
    }

    async fn audit_logs(&self, query: AuditQuery) -> Result<Vec<AuditEntry>> {
        self.gate().await?;
        self.inner.audit_logs(query).await
    }

    async fn export_audit_logs(&self) -> Result<String> {
        self.gate().await?;
        self.inner.export_audit_logs().await
    }

    async fn print_settings(&self) -> Result<PrintSettings> {
        self.gate().await?;
        self.inner.print_settings().await
    }

    async fn save_print_settings(&self, settings: &PrintSettings) -> Result<PrintSettings> {
        self.gate().await?;
        self.inner.save_print_settings(settings).await
    }

    async fn print_label(&self, item_id: &str) -> Result<()> {
        self.gate().await?;
        self.inner.print_label(item_id).await
    }
}
