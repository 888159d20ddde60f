//! In-memory stock-reading fakes.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use stocksync_core::product::{ProductId, Sku};
use stocksync_core::scope::StockId;
use stocksync_core::stock::{
    BundleChildrenProvider, GlobalStockItem, GlobalStockReader, GlobalStockRow, IsProductSalable,
    ScopeStockRow, StockError, StockItemData, StockItemRecord, StockRowSource,
};

/// In-memory stand-in for the two stock storage generations read by the
/// stock data reader: global rows keyed by raw product id, per-scope rows
/// keyed by table name and SKU.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStockRows {
    global: Arc<RwLock<Vec<GlobalStockRow>>>,
    scoped: Arc<RwLock<HashMap<String, Vec<ScopeStockRow>>>>,
    queries: Arc<RwLock<usize>>,
}

impl InMemoryStockRows {
    /// Create an empty row source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to the global stock table.
    pub fn insert_global_row(&self, row: GlobalStockRow) {
        self.global.write().unwrap().push(row);
    }

    /// Add a row to the named per-scope index table.
    pub fn insert_scope_row(&self, table: impl Into<String>, row: ScopeStockRow) {
        self.scoped
            .write()
            .unwrap()
            .entry(table.into())
            .or_default()
            .push(row);
    }

    /// Number of row queries performed so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        *self.queries.read().unwrap()
    }

    fn record_query(&self) {
        *self.queries.write().unwrap() += 1;
    }
}

impl StockRowSource for InMemoryStockRows {
    async fn global_rows(&self, product_ids: &[ProductId]) -> Result<Vec<GlobalStockRow>, StockError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.record_query();
        let requested: Vec<i64> = product_ids.iter().map(|id| id.get()).collect();
        Ok(self
            .global
            .read()
            .unwrap()
            .iter()
            .filter(|row| requested.contains(&row.product_id))
            .cloned()
            .collect())
    }

    async fn scope_rows(&self, table: &str, skus: &[Sku]) -> Result<Vec<ScopeStockRow>, StockError> {
        if skus.is_empty() {
            return Ok(Vec::new());
        }
        self.record_query();
        let requested: Vec<&str> = skus.iter().map(Sku::as_str).collect();
        Ok(self
            .scoped
            .read()
            .unwrap()
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| requested.contains(&row.sku.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// In-memory legacy/global stock flags.
#[derive(Clone, Debug, Default)]
pub struct InMemoryGlobalStock {
    flags: Arc<RwLock<HashMap<ProductId, bool>>>,
    reads: Arc<RwLock<usize>>,
}

impl InMemoryGlobalStock {
    /// Create an empty flag table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a product's global in-stock flag.
    pub fn set_in_stock(&self, product_id: ProductId, is_in_stock: bool) {
        self.flags.write().unwrap().insert(product_id, is_in_stock);
    }

    /// Number of global stock reads performed so far.
    #[must_use]
    pub fn read_count(&self) -> usize {
        *self.reads.read().unwrap()
    }
}

impl GlobalStockReader for InMemoryGlobalStock {
    async fn global_stock(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<GlobalStockItem>, StockError> {
        *self.reads.write().unwrap() += 1;
        let flags = self.flags.read().unwrap();
        Ok(product_ids
            .iter()
            .filter_map(|product_id| {
                flags.get(product_id).map(|is_in_stock| GlobalStockItem {
                    product_id: *product_id,
                    is_in_stock: *is_in_stock,
                })
            })
            .collect())
    }
}

/// In-memory per-scope stock item data, for composite-resolution tests that
/// do not need the full reader underneath.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStockItems {
    records: Arc<RwLock<HashMap<(i32, ProductId), StockItemRecord>>>,
    error: Arc<RwLock<Option<String>>>,
}

impl InMemoryStockItems {
    /// Create an empty record table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a product's stock data in a scope.
    pub fn insert(&self, stock_id: StockId, product_id: ProductId, record: StockItemRecord) {
        self.records
            .write()
            .unwrap()
            .insert((stock_id.value(), product_id), record);
    }

    /// Make every subsequent read fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.error.write().unwrap() = Some(message.into());
    }
}

impl StockItemData for InMemoryStockItems {
    async fn stock_item_data(
        &self,
        product_ids: &[ProductId],
        stock_id: StockId,
    ) -> Result<HashMap<ProductId, StockItemRecord>, StockError> {
        if let Some(message) = self.error.read().unwrap().clone() {
            return Err(StockError::Storage(message));
        }
        let records = self.records.read().unwrap();
        Ok(product_ids
            .iter()
            .filter_map(|product_id| {
                records
                    .get(&(stock_id.value(), *product_id))
                    .map(|record| (*product_id, record.clone()))
            })
            .collect())
    }
}

/// In-memory bundle option-group enumeration.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBundleChildren {
    groups: Arc<RwLock<HashMap<ProductId, BTreeMap<i64, Vec<ProductId>>>>>,
    error: Arc<RwLock<Option<String>>>,
}

impl InMemoryBundleChildren {
    /// Create an empty enumeration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the option groups of a bundle product.
    pub fn set_children(&self, product_id: ProductId, groups: BTreeMap<i64, Vec<ProductId>>) {
        self.groups.write().unwrap().insert(product_id, groups);
    }

    /// Make every subsequent enumeration fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.error.write().unwrap() = Some(message.into());
    }
}

impl BundleChildrenProvider for InMemoryBundleChildren {
    async fn children_by_group(
        &self,
        product_id: ProductId,
        _require_stockable_only: bool,
    ) -> Result<BTreeMap<i64, Vec<ProductId>>, StockError> {
        if let Some(message) = self.error.read().unwrap().clone() {
            return Err(StockError::Storage(message));
        }
        Ok(self
            .groups
            .read()
            .unwrap()
            .get(&product_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory single-product salability predicate.
///
/// Unknown (SKU, stock) pairs resolve to `false`, matching the host
/// predicate's behaviour for products without index rows.
#[derive(Clone, Debug, Default)]
pub struct InMemorySalability {
    salable: Arc<RwLock<HashMap<(String, i32), bool>>>,
    error: Arc<RwLock<Option<String>>>,
}

impl InMemorySalability {
    /// Create an empty predicate table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the predicate result for a (SKU, stock) pair.
    pub fn set_salable(&self, sku: &Sku, stock_id: StockId, is_salable: bool) {
        self.salable
            .write()
            .unwrap()
            .insert((sku.as_str().to_string(), stock_id.value()), is_salable);
    }

    /// Make every subsequent query fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.error.write().unwrap() = Some(message.into());
    }
}

impl IsProductSalable for InMemorySalability {
    async fn is_salable(&self, sku: &Sku, stock_id: StockId) -> Result<bool, StockError> {
        if let Some(message) = self.error.read().unwrap().clone() {
            return Err(StockError::Storage(message));
        }
        Ok(self
            .salable
            .read()
            .unwrap()
            .get(&(sku.as_str().to_string(), stock_id.value()))
            .copied()
            .unwrap_or(false))
    }
}
