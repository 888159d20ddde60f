//! In-memory catalog translation fakes.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use stocksync_core::catalog::{CatalogError, SkuLookup, SourceItemLookup};
use stocksync_core::product::{ProductId, Sku, SourceItemId};

/// In-memory catalog for id↔SKU and source-item translation.
///
/// Mirrors the `PgCatalog` contract: missing SKUs fail with
/// [`CatalogError::SkusNotFound`], source items join to products by SKU
/// equality, and empty inputs short-circuit before touching the "storage"
/// (the lookup counter).
///
/// # Example
///
/// ```
/// use stocksync_testing::InMemoryCatalog;
/// use stocksync_core::catalog::SourceItemLookup;
/// use stocksync_core::product::{ProductId, Sku, SourceItemId};
///
/// # async fn example() {
/// let catalog = InMemoryCatalog::new();
/// catalog.insert_product(ProductId::new(55).unwrap(), Sku::new("SKU-A"));
/// catalog.insert_source_item(SourceItemId::new(101), Sku::new("SKU-A"));
///
/// let ids = catalog
///     .product_ids_for_source_items(&[SourceItemId::new(101)])
///     .await
///     .unwrap();
/// assert_eq!(ids, vec![ProductId::new(55).unwrap()]);
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Sku>>>,
    source_items: Arc<RwLock<HashMap<SourceItemId, Sku>>>,
    lookups: Arc<RwLock<usize>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product with its SKU.
    pub fn insert_product(&self, product_id: ProductId, sku: Sku) {
        self.products.write().unwrap().insert(product_id, sku);
    }

    /// Register a source item carrying the given SKU.
    pub fn insert_source_item(&self, source_item_id: SourceItemId, sku: Sku) {
        self.source_items.write().unwrap().insert(source_item_id, sku);
    }

    /// Number of storage-touching lookups performed so far.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        *self.lookups.read().unwrap()
    }

    /// Clear all data and counters (for test isolation).
    pub fn clear(&self) {
        self.products.write().unwrap().clear();
        self.source_items.write().unwrap().clear();
        *self.lookups.write().unwrap() = 0;
    }

    fn record_lookup(&self) {
        *self.lookups.write().unwrap() += 1;
    }
}

impl SkuLookup for InMemoryCatalog {
    async fn skus_by_product_ids(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Sku>, CatalogError> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.record_lookup();

        let products = self.products.read().unwrap();
        let mut skus = HashMap::with_capacity(product_ids.len());
        let mut missing = Vec::new();
        for product_id in product_ids {
            match products.get(product_id) {
                Some(sku) => {
                    skus.insert(*product_id, sku.clone());
                }
                None => missing.push(*product_id),
            }
        }
        if missing.is_empty() {
            Ok(skus)
        } else {
            Err(CatalogError::SkusNotFound { missing })
        }
    }
}

impl SourceItemLookup for InMemoryCatalog {
    async fn product_ids_for_source_items(
        &self,
        source_item_ids: &[SourceItemId],
    ) -> Result<Vec<ProductId>, CatalogError> {
        if source_item_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.record_lookup();

        let source_items = self.source_items.read().unwrap();
        let products = self.products.read().unwrap();
        let mut seen = HashSet::new();
        let mut product_ids = Vec::new();
        for source_item_id in source_item_ids {
            let Some(sku) = source_items.get(source_item_id) else {
                continue; // unknown source items are silently excluded
            };
            for (product_id, product_sku) in products.iter() {
                if product_sku == sku && seen.insert(*product_id) {
                    product_ids.push(*product_id);
                }
            }
        }
        Ok(product_ids)
    }
}
