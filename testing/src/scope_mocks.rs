//! In-memory store-registry and sales-channel fakes.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use stocksync_core::scope::{
    SalesChannelStocks, ScopeError, StockId, Store, StoreId, StoreRegistry, Website, WebsiteId,
};

/// In-memory website/store registry.
///
/// Tracks how many registry lookups were made so tests can assert that
/// short-circuiting paths never consult it.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStoreRegistry {
    websites: Arc<RwLock<HashMap<WebsiteId, Website>>>,
    default_website: Arc<RwLock<Option<Website>>>,
    stores: Arc<RwLock<HashMap<StoreId, Store>>>,
    lookups: Arc<RwLock<usize>>,
}

impl InMemoryStoreRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a website.
    pub fn insert_website(&self, website: Website) {
        self.websites.write().unwrap().insert(website.id, website);
    }

    /// Set the website returned when no id is given.
    pub fn set_default_website(&self, website: Website) {
        *self.default_website.write().unwrap() = Some(website);
    }

    /// Register a store view.
    pub fn insert_store(&self, store: Store) {
        self.stores.write().unwrap().insert(store.id, store);
    }

    /// Number of registry lookups performed so far.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        *self.lookups.read().unwrap()
    }

    fn record_lookup(&self) {
        *self.lookups.write().unwrap() += 1;
    }
}

impl StoreRegistry for InMemoryStoreRegistry {
    async fn website(&self, website_id: Option<WebsiteId>) -> Result<Website, ScopeError> {
        self.record_lookup();
        match website_id {
            Some(id) => self
                .websites
                .read()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(ScopeError::WebsiteNotFound {
                    website_id: Some(id),
                }),
            None => self
                .default_website
                .read()
                .unwrap()
                .clone()
                .ok_or(ScopeError::WebsiteNotFound { website_id: None }),
        }
    }

    async fn store(&self, store_id: StoreId) -> Result<Store, ScopeError> {
        self.record_lookup();
        self.stores
            .read()
            .unwrap()
            .get(&store_id)
            .cloned()
            .ok_or(ScopeError::StoreNotFound(store_id))
    }
}

/// In-memory sales-channel → stock assignment.
#[derive(Clone, Debug, Default)]
pub struct InMemoryChannelStocks {
    assignments: Arc<RwLock<HashMap<String, StockId>>>,
}

impl InMemoryChannelStocks {
    /// Create an empty assignment table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a stock to the website sales channel with the given code.
    pub fn assign(&self, website_code: impl Into<String>, stock_id: StockId) {
        self.assignments
            .write()
            .unwrap()
            .insert(website_code.into(), stock_id);
    }
}

impl SalesChannelStocks for InMemoryChannelStocks {
    async fn stock_for_website(&self, website_code: &str) -> Result<StockId, ScopeError> {
        self.assignments
            .read()
            .unwrap()
            .get(website_code)
            .copied()
            .ok_or_else(|| ScopeError::NoStockForChannel(website_code.to_string()))
    }
}
