//! Product id translation collaborators.
//!
//! The catalog stores the id↔SKU association once, but the inventory
//! subsystem is keyed by SKU while most callers hold product ids. These two
//! traits are the narrow seams over that translation:
//!
//! - [`SkuLookup`] resolves SKUs for product ids (per-scope stock index
//!   tables are keyed by SKU).
//! - [`SourceItemLookup`] resolves the product ids owning a set of inventory
//!   source items (the changelog records source-item ids, the sync queue
//!   wants product ids).
//!
//! # Implementations
//!
//! - `PgCatalog` (in `stocksync-postgres`): production implementation
//! - `InMemoryCatalog` (in `stocksync-testing`): fast, deterministic testing

use crate::product::{ProductId, Sku, SourceItemId};
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;

/// Errors raised by catalog translation lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Some of the requested product ids have no SKU.
    #[error("No SKUs found for product ids {missing:?}")]
    SkusNotFound {
        /// The ids that could not be resolved.
        missing: Vec<ProductId>,
    },

    /// Catalog storage fault.
    #[error("Catalog storage error: {0}")]
    Storage(String),
}

/// Resolve SKUs for product ids.
pub trait SkuLookup: Send + Sync {
    /// SKUs for the given product ids, keyed by product id.
    ///
    /// Empty input yields an empty map without touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SkusNotFound`] naming the missing ids when
    /// some ids have no SKU, [`CatalogError::Storage`] on storage faults.
    fn skus_by_product_ids(
        &self,
        product_ids: &[ProductId],
    ) -> impl Future<Output = Result<HashMap<ProductId, Sku>, CatalogError>> + Send;
}

/// Resolve the product ids owning inventory source items.
pub trait SourceItemLookup: Send + Sync {
    /// The distinct set of product ids owning at least one of the given
    /// source items (joined by SKU equality).
    ///
    /// Empty input yields empty output without touching storage. Unknown
    /// source-item ids are silently excluded.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] on storage faults.
    fn product_ids_for_source_items(
        &self,
        source_item_ids: &[SourceItemId],
    ) -> impl Future<Output = Result<Vec<ProductId>, CatalogError>> + Send;
}
