//! In-memory mock data source
//!
//! A session-local catalog used when no backend is available. Barcode lookups
//! that miss synthesize a new item seeded from the barcode and keep it, so
//! repeated lookups within a session stay consistent.


use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::DataSource;
use crate::error::{ApiError, Result};
use crate::models::requests::{validate_category, validate_search};
use crate::models::{
    audit_csv, AuditAction, AuditEntry, AuditQuery, Item, PrintSettings, ScanLogItem,
    SquareStatus,
};

/// Maximum rows returned by `recent_logs`
pub const RECENT_LOG_LIMIT: usize = 50;

const MOCK_USER: &str = "admin";

#[derive(Debug, Default)]
struct Catalog {
    items: Vec<Item>,
    categories: Vec<String>,
    audit: Vec<AuditEntry>,
    print_settings: PrintSettings,
}

impl Catalog {
    fn record(&mut self, action: AuditAction, details: String, item: Option<&Item>) {
        self.audit.push(AuditEntry {
            id: format!("log-{}", self.audit.len() + 1),
            action,
            user: MOCK_USER.to_string(),
            timestamp: Utc::now(),
            details,
            item_id: item.map(|i| i.id.clone()),
            item_name: item.map(|i| i.name.clone()),
        });
    }
}

/// In-memory catalog implementing [`DataSource`].
#[derive(Debug)]
pub struct InMemoryMockDataSource {
    catalog: RwLock<Catalog>,
}

impl InMemoryMockDataSource {
    /// Catalog seeded with two sample items.
    pub fn new() -> Self {
        Self::with_items(seed_items())
    }

    /// Catalog with no items.
    pub fn empty() -> Self {
        Self::with_items(Vec::new())
    }

    /// Catalog holding `items`; categories are taken from the items.
    pub fn with_items(items: Vec<Item>) -> Self {
        let mut categories: Vec<String> = items.iter().filter_map(|i| i.category.clone()).collect();
        categories.sort();
        categories.dedup();

        Self {
            catalog: RwLock::new(Catalog {
                items,
                categories,
                ..Catalog::default()
            }),
        }
    }

    /// Snapshot of the catalog's items in insertion order.
    pub async fn items(&self) -> Vec<Item> {
        self.catalog.read().await.items.clone()
    }
}

impl Default for InMemoryMockDataSource {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_items() -> Vec<Item> {
    let now = Utc::now();
    vec![
        Item {
            id: "1".to_string(),
            name: "Test Item 1".to_string(),
            description: "This is a test item".to_string(),
            price: Some(9.99),
            sku: Some("TEST001".to_string()),
            gtin: Some("123456789012".to_string()),
            barcode: Some("123456789012".to_string()),
            category: Some("Test Category".to_string()),
            tax: true,
            tax_redondo: true,
            crv: true,
            timestamp: Some(now),
            ..Item::default()
        },
        Item {
            id: "2".to_string(),
            name: "Test Item 2".to_string(),
            description: "Another test item".to_string(),
            price: Some(19.99),
            sku: Some("TEST002".to_string()),
            gtin: Some("223456789012".to_string()),
            barcode: Some("223456789012".to_string()),
            category: Some("Food".to_string()),
            tax: true,
            tax_torrance: true,
            crv5: true,
            timestamp: Some(now),
            ..Item::default()
        },
    ]
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the barcode bytes, stable across runs and platforms.
fn barcode_seed(barcode: &str) -> u64 {
    barcode.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

fn mock_id() -> String {
    format!("mock_{}", Uuid::new_v4().simple())
}

/// Builds a new item for an unknown barcode.
///
/// Attributes are pseudo-random but determined by the barcode for a given
/// build of `rand` (`StdRng` output may change between rand releases): price
/// is in whole cents in `[0, 10)`, `tax` and `taxRedondo` are each set about
/// half the time, `crv` about 30% of the time. Only the id is fresh.
pub fn synthesize_item(barcode: &str) -> Item {
    let mut rng = StdRng::seed_from_u64(barcode_seed(barcode));
    let cents: u32 = rng.gen_range(0..1000);
    let sku_prefix: String = barcode.chars().take(6).collect();

    Item {
        id: mock_id(),
        name: format!("Item {}", barcode),
        description: "Mock item created in development mode".to_string(),
        sku: Some(format!("SKU{}", sku_prefix)),
        gtin: Some(barcode.to_string()),
        barcode: Some(barcode.to_string()),
        price: Some(f64::from(cents) / 100.0),
        category: Some("New Items".to_string()),
        tax: rng.gen_bool(0.5),
        tax_redondo: rng.gen_bool(0.5),
        crv: rng.gen_bool(0.3),
        timestamp: Some(Utc::now()),
        ..Item::default()
    }
}

#[async_trait]
impl DataSource for InMemoryMockDataSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn recent_logs(&self) -> Result<Vec<ScanLogItem>> {
        let catalog = self.catalog.read().await;
        let now = Utc::now();
        let mut logs: Vec<ScanLogItem> = catalog
            .items
            .iter()
            .map(|item| ScanLogItem::from_item(item, now))
            .collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.truncate(RECENT_LOG_LIMIT);
        Ok(logs)
    }

    async fn item_by_barcode(&self, barcode: &str) -> Result<Item> {
        if let Some(item) = self
            .catalog
            .read()
            .await
            .items
            .iter()
            .find(|item| item.matches_barcode(barcode))
        {
            return Ok(item.clone());
        }

        let mut catalog = self.catalog.write().await;
        // Another lookup may have synthesized it while we waited for the lock
        if let Some(item) = catalog.items.iter().find(|item| item.matches_barcode(barcode)) {
            return Ok(item.clone());
        }

        let item = synthesize_item(barcode);
        debug!("Synthesized mock item {} for barcode {}", item.id, barcode);
        catalog.items.push(item.clone());
        Ok(item)
    }

    async fn item_by_id(&self, id: &str) -> Result<Item> {
        self.catalog
            .read()
            .await
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Item not found"))
    }

    async fn search_items(&self, query: &str) -> Result<Vec<Item>> {
        let needle = validate_search(query)?.to_lowercase();
        let matches = |field: Option<&str>| {
            field.map_or(false, |value| value.to_lowercase().contains(&needle))
        };

        let catalog = self.catalog.read().await;
        Ok(catalog
            .items
            .iter()
            .filter(|item| {
                matches(Some(&item.name))
                    || matches(item.sku.as_deref())
                    || matches(item.gtin.as_deref())
                    || matches(item.barcode.as_deref())
            })
            .cloned()
            .collect())
    }

    async fn create_item(&self, item: &Item) -> Result<Item> {
        item.validate()?;

        let created = Item {
            id: mock_id(),
            timestamp: Some(Utc::now()),
            ..item.clone()
        };

        let mut catalog = self.catalog.write().await;
        catalog.items.push(created.clone());
        catalog.record(
            AuditAction::ItemCreated,
            format!("Item Created {} ({})", created.name, created.id),
            Some(&created),
        );
        Ok(created)
    }

    async fn update_item(&self, item: &Item) -> Result<Item> {
        if item.is_new() {
            return Err(ApiError::validation("Item ID is required for updates"));
        }
        item.validate()?;

        let mut catalog = self.catalog.write().await;
        let found = catalog
            .items
            .iter_mut()
            .find(|existing| existing.id == item.id);
        let stored = match found {
            // Re-sending identical content leaves the item and audit trail untouched
            Some(existing) if existing.same_content(item) => return Ok(existing.clone()),
            Some(existing) => {
                *existing = Item {
                    timestamp: Some(Utc::now()),
                    ..item.clone()
                };
                existing.clone()
            }
            None => {
                let added = Item {
                    timestamp: Some(Utc::now()),
                    ..item.clone()
                };
                catalog.items.push(added.clone());
                added
            }
        };

        catalog.record(
            AuditAction::ItemUpdated,
            format!("Item Updated {} ({})", stored.name, stored.id),
            Some(&stored),
        );
        Ok(stored)
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        let mut catalog = self.catalog.write().await;
        let index = catalog
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| ApiError::not_found("Item not found"))?;

        let removed = catalog.items.remove(index);
        catalog.record(
            AuditAction::ItemDeleted,
            format!("Item Deleted {} ({})", removed.name, removed.id),
            Some(&removed),
        );
        Ok(())
    }

    async fn square_status(&self) -> Result<SquareStatus> {
        let catalog = self.catalog.read().await;
        Ok(SquareStatus {
            connected: true,
            message: Some("Connected to Square (Development Mode)".to_string()),
            error: None,
            last_sync: Some(Utc::now()),
            environment: Some("development".to_string()),
            has_items: Some(!catalog.items.is_empty()),
        })
    }

    async fn categories(&self) -> Result<Vec<String>> {
        Ok(self.catalog.read().await.categories.clone())
    }

    async fn add_category(&self, name: &str) -> Result<Vec<String>> {
        let name = validate_category(name)?;

        let mut catalog = self.catalog.write().await;
        if catalog
            .categories
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(name))
        {
            return Err(ApiError::validation(format!("Category '{}' already exists", name)));
        }

        catalog.categories.push(name.to_string());
        catalog.categories.sort();
        catalog.record(
            AuditAction::CategoryCreated,
            format!("Category Created {}", name),
            None,
        );
        Ok(catalog.categories.clone())
    }

    async fn delete_category(&self, name: &str) -> Result<Vec<String>> {
        let mut catalog = self.catalog.write().await;
        let index = catalog
            .categories
            .iter()
            .position(|existing| existing == name)
            .ok_or_else(|| ApiError::not_found(format!("Category '{}' not found", name)))?;

        catalog.categories.remove(index);
        catalog.record(
            AuditAction::CategoryDeleted,
            format!("Category Deleted {}", name),
            None,
        );
        Ok(catalog.categories.clone())
    }

    async fn audit_logs(&self, query: AuditQuery) -> Result<Vec<AuditEntry>> {
        query.validate()?;

        let catalog = self.catalog.read().await;
        Ok(catalog
            .audit
            .iter()
            .rev()
            .skip(query.offset())
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn export_audit_logs(&self) -> Result<String> {
        let catalog = self.catalog.read().await;
        let newest_first: Vec<AuditEntry> = catalog.audit.iter().rev().cloned().collect();
        Ok(audit_csv(&newest_first))
    }

    async fn print_settings(&self) -> Result<PrintSettings> {
        Ok(self.catalog.read().await.print_settings.clone())
    }

    async fn save_print_settings(&self, settings: &PrintSettings) -> Result<PrintSettings> {
        settings.validate()?;

        let mut catalog = self.catalog.write().await;
        catalog.print_settings = settings.clone();
        catalog.record(
            AuditAction::SettingsChanged,
            format!("{} changed print settings", MOCK_USER),
            None,
        );
        Ok(settings.clone())
    }

    async fn print_label(&self, item_id: &str) -> Result<()> {
        let mut catalog = self.catalog.write().await;
        let item = catalog
            .items
            .iter()
            .find(|item| item.id == item_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Item not found"))?;

        if !catalog.print_settings.enabled {
            return Err(ApiError::validation("Label printing is disabled"));
        }

        catalog.record(
            AuditAction::LabelPrinted,
            format!("Label Printed {} ({})", item.name, item.id),
            Some(&item),
        );
        Ok(())
    }
}
