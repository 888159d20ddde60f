//! Stock records and stock-reading collaborators.
//!
//! Two storage generations coexist in the host platform:
//!
//! - the **legacy/global** stock tables, keyed by product id, carrying the
//!   product's own in-stock flag regardless of scope;
//! - the **per-scope index** tables (`inventory_stock_<id>`), keyed by SKU,
//!   carrying pre-aggregated salability per stock scope.
//!
//! Composite products straddle the two: their own flag is only global, while
//! their children only appear per scope. The traits here expose both sides
//! so the resolution engine in `stocksync-stock` can combine them.

use crate::catalog::CatalogError;
use crate::product::{ProductId, ProductType, Sku};
use crate::scope::StockId;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use thiserror::Error;

/// The legacy global stock status table, keyed by product id.
pub const GLOBAL_STOCK_TABLE: &str = "cataloginventory_stock_status";

/// One salability/quantity tuple read from a stock table.
///
/// Transient: recomputed on every read, never cached across calls. Absence
/// of a product from a result map is meaningful — it says the scope has no
/// qualifying row for that product (bundle parents never appear in per-scope
/// tables) — and must not be conflated with `is_salable == false`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockItemRecord {
    /// Aggregated quantity in the scope.
    pub quantity: BigDecimal,
    /// Whether the product is salable in the scope.
    pub is_salable: bool,
}

/// Legacy/global stock flag for a single product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStockItem {
    /// The product the flag belongs to.
    pub product_id: ProductId,
    /// The product's own global in-stock flag.
    pub is_in_stock: bool,
}

/// A composite (configurable or bundle) product as seen by the stock
/// resolver.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeProduct {
    /// Product id; composite resolution fails closed without one.
    pub id: Option<ProductId>,
    /// Host catalog type code.
    pub product_type: ProductType,
    /// Caller-attached global stock row, preferred over a fresh fetch when
    /// present.
    pub stock_item: Option<GlobalStockItem>,
}

/// Raw row from the global stock table, keyed by product id.
///
/// The id is left untyped here; the reader validates it and drops malformed
/// rows at the mapping step.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalStockRow {
    /// Raw product id as stored.
    pub product_id: i64,
    /// Stocked quantity.
    pub quantity: BigDecimal,
    /// Salability flag.
    pub is_salable: bool,
}

/// Raw row from a per-scope stock index table, keyed by SKU.
#[derive(Clone, Debug, PartialEq)]
pub struct ScopeStockRow {
    /// Raw SKU as stored.
    pub sku: String,
    /// Aggregated quantity in the scope.
    pub quantity: BigDecimal,
    /// Salability flag in the scope.
    pub is_salable: bool,
}

/// Errors raised by stock reads.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StockError {
    /// Stock storage fault.
    #[error("Could not retrieve stock item data: {0}")]
    Storage(String),

    /// Catalog translation failed while resolving SKUs for a scoped read.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Bulk read of the legacy/global stock flags.
pub trait GlobalStockReader: Send + Sync {
    /// Global stock items for the given product ids. Products without a
    /// global stock row are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Storage`] on storage faults.
    fn global_stock(
        &self,
        product_ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<GlobalStockItem>, StockError>> + Send;
}

/// Raw row access under the stock data reader: the two storage generations
/// behind one narrow seam.
pub trait StockRowSource: Send + Sync {
    /// Rows from the global stock table for the given product ids.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Storage`] on storage faults.
    fn global_rows(
        &self,
        product_ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<GlobalStockRow>, StockError>> + Send;

    /// Rows from the named per-scope index table for the given SKUs.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Storage`] on storage faults.
    fn scope_rows(
        &self,
        table: &str,
        skus: &[Sku],
    ) -> impl Future<Output = Result<Vec<ScopeStockRow>, StockError>> + Send;
}

/// Resolution of stock scopes to their storage locations.
pub trait StockIndexTables: Send + Sync {
    /// The platform's designated default/global scope id.
    fn default_stock_id(&self) -> StockId {
        StockId::DEFAULT
    }

    /// Storage location name for a non-default scope.
    fn table_name(&self, stock_id: StockId) -> String;
}

/// Deterministic `inventory_stock_<id>` naming used by the host platform.
///
/// # Examples
///
/// ```
/// use stocksync_core::stock::{MsiTableNaming, StockIndexTables};
/// use stocksync_core::scope::StockId;
///
/// let naming = MsiTableNaming::new();
/// assert_eq!(naming.table_name(StockId::new(3)), "inventory_stock_3");
///
/// let prefixed = MsiTableNaming::new().with_prefix("m2_");
/// assert_eq!(prefixed.table_name(StockId::new(3)), "m2_inventory_stock_3");
/// ```
#[derive(Clone, Debug, Default)]
pub struct MsiTableNaming {
    prefix: Option<String>,
}

impl MsiTableNaming {
    /// Naming without a table prefix.
    #[must_use]
    pub const fn new() -> Self {
        Self { prefix: None }
    }

    /// Apply the installation's table prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

impl StockIndexTables for MsiTableNaming {
    fn table_name(&self, stock_id: StockId) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}inventory_stock_{}", stock_id.value()),
            None => format!("inventory_stock_{}", stock_id.value()),
        }
    }
}

/// Per-scope stock item data, keyed back to product ids.
///
/// Implemented by the stock data reader in `stocksync-stock`; fakes can
/// implement it directly for composite-resolution tests.
pub trait StockItemData: Send + Sync {
    /// Salability/quantity records for the given products in the given
    /// scope. Absence from the map is meaningful (see [`StockItemRecord`]).
    ///
    /// # Errors
    ///
    /// Returns [`StockError`] on storage or translation faults.
    fn stock_item_data(
        &self,
        product_ids: &[ProductId],
        stock_id: StockId,
    ) -> impl Future<Output = Result<HashMap<ProductId, StockItemRecord>, StockError>> + Send;
}

/// Enumeration of a bundle product's option groups and their children.
///
/// Group id `0` is the host platform's synthetic merge of all non-required
/// option groups.
pub trait BundleChildrenProvider: Send + Sync {
    /// Child product ids per option group.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Storage`] on storage faults.
    fn children_by_group(
        &self,
        product_id: ProductId,
        require_stockable_only: bool,
    ) -> impl Future<Output = Result<BTreeMap<i64, Vec<ProductId>>, StockError>> + Send;
}

/// The host inventory subsystem's single-product salability predicate.
pub trait IsProductSalable: Send + Sync {
    /// Whether the product with the given SKU is salable in the scope.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Storage`] on storage faults.
    fn is_salable(
        &self,
        sku: &Sku,
        stock_id: StockId,
    ) -> impl Future<Output = Result<bool, StockError>> + Send;
}
