//! API Client
//!
//! The single choke point for backend interaction. Validates input, serves
//! repeated reads from the TTL cache, dispatches to the configured data
//! source (falling back to the mock catalog on transport failures when
//! enabled) and wraps every outcome in an [`ApiResponse`].

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, Clock, SystemClock, TtlCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::requests::{validate_category, validate_search};
use crate::models::{
    ApiResponse, AuditEntry, AuditQuery, Item, PrintSettings, ScanLogItem, SquareStatus,
};
use crate::source::{self, DataSource, DataSources};

// == Cache Keys ==
const BARCODE_PREFIX: &str = "item_barcode_";
const ID_PREFIX: &str = "item_id_";
const RECENT_LOGS_KEY: &str = "recent_logs";
const SQUARE_STATUS_KEY: &str = "square_status";
const CATEGORIES_KEY: &str = "categories";
const PRINT_SETTINGS_KEY: &str = "print_settings";

fn barcode_key(barcode: &str) -> String {
    format!("{}{}", BARCODE_PREFIX, barcode)
}

fn id_key(id: &str) -> String {
    format!("{}{}", ID_PREFIX, id)
}

// == Cached Values ==
/// Everything the client caches, in one value type.
#[derive(Debug, Clone)]
enum Cached {
    Item(Item),
    Logs(Vec<ScanLogItem>),
    Status(SquareStatus),
    Categories(Vec<String>),
    PrintSettings(PrintSettings),
}

trait Cacheable: Clone + Sized {
    fn wrap(self) -> Cached;
    fn unwrap(cached: Cached) -> Option<Self>;
}

macro_rules! cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn wrap(self) -> Cached {
                Cached::$variant(self)
            }

            fn unwrap(cached: Cached) -> Option<Self> {
                match cached {
                    Cached::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

cacheable!(Item, Item);
cacheable!(Vec<ScanLogItem>, Logs);
cacheable!(SquareStatus, Status);
cacheable!(Vec<String>, Categories);
cacheable!(PrintSettings, PrintSettings);

/// Cache lifetimes per resource, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    /// Items, categories and print settings
    pub item_ms: u64,
    pub logs_ms: u64,
    pub status_ms: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CacheTtls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            item_ms: config.item_cache_ttl_ms,
            logs_ms: config.logs_cache_ttl_ms,
            status_ms: config.status_cache_ttl_ms,
        }
    }
}

// == Api Client ==
/// Cheap to clone; clones share the cache and data sources.
#[derive(Clone)]
pub struct ApiClient {
    primary: Arc<dyn DataSource>,
    fallback: Option<Arc<dyn DataSource>>,
    cache: Arc<RwLock<TtlCache<Cached>>>,
    ttls: CacheTtls,
}

impl ApiClient {
    /// Creates a client over `sources` using the system clock.
    pub fn new(sources: DataSources, ttls: CacheTtls) -> Self {
        Self::with_clock(sources, ttls, Arc::new(SystemClock))
    }

    /// Creates a client whose cache expiry follows `clock`.
    pub fn with_clock(sources: DataSources, ttls: CacheTtls, clock: Arc<dyn Clock>) -> Self {
        Self {
            primary: sources.primary,
            fallback: sources.fallback,
            cache: Arc::new(RwLock::new(TtlCache::with_clock(clock, ttls.item_ms))),
            ttls,
        }
    }

    /// Builds the data sources and cache lifetimes from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let sources = source::from_config(config)?;
        Ok(Self::new(sources, CacheTtls::from_config(config)))
    }

    /// Name of the primary data source.
    pub fn source_name(&self) -> &'static str {
        self.primary.name()
    }

    // == Dispatch ==

    /// Runs `call` against the primary source, retrying against the fallback
    /// when the primary fails with a transport error.
    async fn dispatch<T, F, Fut>(&self, op: &str, call: F) -> Result<T>
    where
        F: Fn(Arc<dyn DataSource>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match call(self.primary.clone()).await {
            Err(ApiError::Transport(message)) => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        "{} failed on {} ({}), using {} fallback",
                        op,
                        self.primary.name(),
                        message,
                        fallback.name()
                    );
                    call(fallback.clone()).await
                }
                None => Err(ApiError::Transport(message)),
            },
            other => other,
        }
    }

    /// Serves `key` from the cache or loads it with `call` and caches it.
    async fn read_through<T, F, Fut>(
        &self,
        key: String,
        ttl_ms: u64,
        op: &str,
        call: F,
    ) -> Result<T>
    where
        T: Cacheable,
        F: Fn(Arc<dyn DataSource>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.cached::<T>(&key).await {
            debug!("Cache hit: {}", key);
            return Ok(hit);
        }
        debug!("Cache miss: {}", key);

        let value = self.dispatch(op, call).await?;
        self.cache
            .write()
            .await
            .set(key, value.clone().wrap(), Some(ttl_ms));
        Ok(value)
    }

    async fn cached<T: Cacheable>(&self, key: &str) -> Option<T> {
        self.cache.write().await.get(key).and_then(T::unwrap)
    }

    async fn invalidate(&self, keys: &[&str]) {
        let mut cache = self.cache.write().await;
        for key in keys {
            cache.invalidate(key);
        }
    }

    /// Drops every cache entry that could hold a stale copy of `item`.
    async fn invalidate_item(&self, item: &Item) {
        let mut cache = self.cache.write().await;
        if !item.id.is_empty() {
            cache.invalidate(&id_key(&item.id));
        }
        for code in [item.gtin.as_deref(), item.barcode.as_deref()]
            .into_iter()
            .flatten()
            .filter(|code| !code.is_empty())
        {
            cache.invalidate(&barcode_key(code));
        }
        cache.invalidate(RECENT_LOGS_KEY);
    }

    // == Items ==

    /// Looks up an item by scanned barcode.
    pub async fn get_item_by_barcode(&self, barcode: &str) -> ApiResponse<Item> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return rejected(ApiError::validation("Barcode is required"));
        }

        let result = self
            .read_through(
                barcode_key(barcode),
                self.ttls.item_ms,
                "item lookup",
                |source| async move { source.item_by_barcode(barcode).await },
            )
            .await;
        respond("get_item_by_barcode", result)
    }

    pub async fn get_item_by_id(&self, id: &str) -> ApiResponse<Item> {
        let id = id.trim();
        if id.is_empty() {
            return rejected(ApiError::validation("Item ID is required"));
        }

        let result = self
            .read_through(
                id_key(id),
                self.ttls.item_ms,
                "item lookup",
                |source| async move { source.item_by_id(id).await },
            )
            .await;
        respond("get_item_by_id", result)
    }

    pub async fn create_item(&self, item: &Item) -> ApiResponse<Item> {
        if let Err(err) = item.validate() {
            return rejected(err);
        }

        let result = self
            .dispatch("create item", |source| async move {
                source.create_item(item).await
            })
            .await;
        if let Ok(created) = &result {
            info!("Created item {} ({})", created.name, created.id);
            self.invalidate_item(created).await;
        }
        respond("create_item", result)
    }

    pub async fn update_item(&self, item: &Item) -> ApiResponse<Item> {
        if item.is_new() {
            return rejected(ApiError::validation("Item ID is required for updates"));
        }
        if let Err(err) = item.validate() {
            return rejected(err);
        }

        let result = self
            .dispatch("update item", |source| async move {
                source.update_item(item).await
            })
            .await;
        if let Ok(updated) = &result {
            info!("Updated item {} ({})", updated.name, updated.id);
            // The submitted codes may differ from the stored ones
            self.invalidate_item(item).await;
            self.invalidate_item(updated).await;
        }
        respond("update_item", result)
    }

    /// Creates unsaved drafts and updates everything else.
    pub async fn save_item(&self, item: &Item) -> ApiResponse<Item> {
        if item.is_new() {
            self.create_item(item).await
        } else {
            self.update_item(item).await
        }
    }

    pub async fn delete_item(&self, id: &str) -> ApiResponse<()> {
        let id = id.trim();
        if id.is_empty() {
            return rejected(ApiError::validation("Item ID is required"));
        }

        let result = self
            .dispatch("delete item", |source| async move {
                source.delete_item(id).await
            })
            .await;
        if result.is_ok() {
            info!("Deleted item {}", id);
            let mut cache = self.cache.write().await;
            cache.invalidate(&id_key(id));
            cache.invalidate_by_prefix(BARCODE_PREFIX);
            cache.invalidate(RECENT_LOGS_KEY);
        }
        respond("delete_item", result)
    }

    /// Case-insensitive search over name, SKU, GTIN and barcode. Not cached.
    pub async fn search_items(&self, query: &str) -> ApiResponse<Vec<Item>> {
        let query = match validate_search(query) {
            Ok(query) => query,
            Err(err) => return rejected(err),
        };

        let result = self
            .dispatch("search", |source| async move {
                source.search_items(query).await
            })
            .await;
        respond("search_items", result)
    }

    // == Logs & Status ==

    pub async fn get_recent_logs(&self) -> ApiResponse<Vec<ScanLogItem>> {
        let result = self
            .read_through(
                RECENT_LOGS_KEY.to_string(),
                self.ttls.logs_ms,
                "recent logs",
                |source| async move { source.recent_logs().await },
            )
            .await;
        respond("get_recent_logs", result)
    }

    /// Square connection status. `force_refresh` skips the cache read.
    ///
    /// A failed check still carries a disconnected status as data.
    pub async fn get_square_status(&self, force_refresh: bool) -> ApiResponse<SquareStatus> {
        if force_refresh {
            self.invalidate(&[SQUARE_STATUS_KEY]).await;
        }

        let result = self
            .read_through(
                SQUARE_STATUS_KEY.to_string(),
                self.ttls.status_ms,
                "square status",
                |source| async move { source.square_status().await },
            )
            .await;

        match result {
            Ok(status) => ApiResponse::ok(status),
            Err(err) => {
                warn!("get_square_status failed: {}", err);
                ApiResponse::failure(&err)
                    .with_data(SquareStatus::disconnected("Connection error"))
            }
        }
    }

    // == Categories ==

    pub async fn get_categories(&self) -> ApiResponse<Vec<String>> {
        let result = self
            .read_through(
                CATEGORIES_KEY.to_string(),
                self.ttls.item_ms,
                "categories",
                |source| async move { source.categories().await },
            )
            .await;
        respond("get_categories", result)
    }

    pub async fn add_category(&self, name: &str) -> ApiResponse<Vec<String>> {
        let name = match validate_category(name) {
            Ok(name) => name,
            Err(err) => return rejected(err),
        };

        let result = self
            .dispatch("add category", |source| async move {
                source.add_category(name).await
            })
            .await;
        if result.is_ok() {
            self.invalidate(&[CATEGORIES_KEY]).await;
        }
        respond("add_category", result)
    }

    pub async fn delete_category(&self, name: &str) -> ApiResponse<Vec<String>> {
        let name = match validate_category(name) {
            Ok(name) => name,
            Err(err) => return rejected(err),
        };

        let result = self
            .dispatch("delete category", |source| async move {
                source.delete_category(name).await
            })
            .await;
        if result.is_ok() {
            self.invalidate(&[CATEGORIES_KEY]).await;
        }
        respond("delete_category", result)
    }

    // == Audit ==

    pub async fn get_audit_logs(&self, page: u32, limit: u32) -> ApiResponse<Vec<AuditEntry>> {
        let query = AuditQuery::new(page, limit);
        if let Err(err) = query.validate() {
            return rejected(err);
        }

        let result = self
            .dispatch("audit logs", |source| async move {
                source.audit_logs(query).await
            })
            .await;
        respond("get_audit_logs", result)
    }

    /// Audit log as CSV text.
    pub async fn export_audit_logs(&self) -> ApiResponse<String> {
        let result = self
            .dispatch("audit export", |source| async move {
                source.export_audit_logs().await
            })
            .await;
        respond("export_audit_logs", result)
    }

    // == Printing ==

    pub async fn get_print_settings(&self) -> ApiResponse<PrintSettings> {
        let result = self
            .read_through(
                PRINT_SETTINGS_KEY.to_string(),
                self.ttls.item_ms,
                "print settings",
                |source| async move { source.print_settings().await },
            )
            .await;
        respond("get_print_settings", result)
    }

    pub async fn save_print_settings(
        &self,
        settings: &PrintSettings,
    ) -> ApiResponse<PrintSettings> {
        if let Err(err) = settings.validate() {
            return rejected(err);
        }

        let result = self
            .dispatch("save print settings", |source| async move {
                source.save_print_settings(settings).await
            })
            .await;
        if result.is_ok() {
            self.invalidate(&[PRINT_SETTINGS_KEY]).await;
        }
        respond("save_print_settings", result)
    }

    pub async fn print_label(&self, item_id: &str) -> ApiResponse<()> {
        let item_id = item_id.trim();
        if item_id.is_empty() {
            return rejected(ApiError::validation("Item ID is required"));
        }

        let result = self
            .dispatch("print label", |source| async move {
                source.print_label(item_id).await
            })
            .await;
        respond("print_label", result)
    }

    // == Cache Maintenance ==

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        info!("Response cache cleared");
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Sweeps expired entries. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.cache.write().await.cleanup_expired()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.as_ref().map(|f| f.name()))
            .field("ttls", &self.ttls)
            .finish()
    }
}

/// Input rejected before any lookup.
fn rejected<T>(err: ApiError) -> ApiResponse<T> {
    debug!("Rejected request: {}", err);
    ApiResponse::failure(&err)
}

fn respond<T>(op: &str, result: Result<T>) -> ApiResponse<T> {
    if let Err(err) = &result {
        warn!("{} failed: {}", op, err);
    }
    result.into()
}
