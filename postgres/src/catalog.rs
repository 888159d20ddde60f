//! Catalog translation backed by the host product and source-item tables.

use sqlx::postgres::PgPool;
use std::collections::HashMap;
use stocksync_core::catalog::{CatalogError, SkuLookup, SourceItemLookup};
use stocksync_core::product::{ProductId, Sku, SourceItemId};

/// Default name of the host catalog's product entity table.
pub const PRODUCT_TABLE: &str = "catalog_product_entity";

/// Name of the inventory source-item table.
pub const SOURCE_ITEM_TABLE: &str = "inventory_source_item";

/// Catalog translation over the host product and source-item tables.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE catalog_product_entity (
///     entity_id BIGINT PRIMARY KEY,
///     sku TEXT NOT NULL
///     -- further catalog columns unused here
/// );
///
/// CREATE TABLE inventory_source_item (
///     source_item_id BIGINT PRIMARY KEY,
///     source_code TEXT NOT NULL,
///     sku TEXT NOT NULL,
///     quantity NUMERIC NOT NULL,
///     status SMALLINT NOT NULL
/// );
/// ```
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
    product_table: String,
}

impl PgCatalog {
    /// Create a catalog over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            product_table: PRODUCT_TABLE.to_string(),
        }
    }

    /// Use a different product entity table (staging setups rename it).
    #[must_use]
    pub fn with_product_table(mut self, table: impl Into<String>) -> Self {
        self.product_table = table.into();
        self
    }
}

impl SkuLookup for PgCatalog {
    async fn skus_by_product_ids(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Sku>, CatalogError> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i64> = product_ids.iter().map(|id| id.get()).collect();
        let query = format!(
            "SELECT entity_id, sku FROM {} WHERE entity_id = ANY($1)",
            self.product_table
        );
        let rows: Vec<(i64, String)> = sqlx::query_as(&query)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CatalogError::Storage(format!("Failed to load SKUs: {e}")))?;

        let mut skus = HashMap::with_capacity(rows.len());
        for (entity_id, sku) in rows {
            let Some(product_id) = ProductId::new(entity_id) else {
                tracing::warn!(entity_id, "Dropping product row with malformed id");
                continue;
            };
            skus.insert(product_id, Sku::new(sku));
        }

        let missing: Vec<ProductId> = product_ids
            .iter()
            .filter(|id| !skus.contains_key(id))
            .copied()
            .collect();
        if missing.is_empty() {
            Ok(skus)
        } else {
            Err(CatalogError::SkusNotFound { missing })
        }
    }
}

impl SourceItemLookup for PgCatalog {
    async fn product_ids_for_source_items(
        &self,
        source_item_ids: &[SourceItemId],
    ) -> Result<Vec<ProductId>, CatalogError> {
        if source_item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = source_item_ids.iter().map(|id| id.get()).collect();
        let query = format!(
            "SELECT DISTINCT product.entity_id \
             FROM {SOURCE_ITEM_TABLE} AS source_item \
             JOIN {} AS product ON source_item.sku = product.sku \
             WHERE source_item.source_item_id = ANY($1) \
             ORDER BY product.entity_id",
            self.product_table
        );
        let rows: Vec<(i64,)> = sqlx::query_as(&query)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                CatalogError::Storage(format!("Failed to join source items to products: {e}"))
            })?;

        let mut product_ids = Vec::with_capacity(rows.len());
        for (entity_id,) in rows {
            match ProductId::new(entity_id) {
                Some(product_id) => product_ids.push(product_id),
                None => {
                    tracing::warn!(
                        entity_id,
                        "Dropping malformed product id from source item join"
                    );
                }
            }
        }
        Ok(product_ids)
    }
}
