//! Stock row reads over the two storage generations.

use bigdecimal::BigDecimal;
use sqlx::postgres::PgPool;
use stocksync_core::product::{ProductId, Sku};
use stocksync_core::stock::{
    GlobalStockItem, GlobalStockReader, GlobalStockRow, ScopeStockRow, StockError, StockRowSource,
    GLOBAL_STOCK_TABLE,
};

/// Name of the legacy per-product stock item table.
pub const GLOBAL_STOCK_ITEM_TABLE: &str = "cataloginventory_stock_item";

/// Raw row access to the global stock status table and the per-scope index
/// tables.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cataloginventory_stock_status (
///     product_id BIGINT PRIMARY KEY,
///     qty NUMERIC NOT NULL,
///     stock_status SMALLINT NOT NULL
/// );
///
/// -- one per non-default stock scope, named inventory_stock_<id>
/// CREATE TABLE inventory_stock_4 (
///     sku TEXT PRIMARY KEY,
///     quantity NUMERIC NOT NULL,
///     is_salable SMALLINT NOT NULL
/// );
/// ```
#[derive(Clone)]
pub struct PgStockRows {
    pool: PgPool,
}

impl PgStockRows {
    /// Create a row source over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl StockRowSource for PgStockRows {
    async fn global_rows(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<GlobalStockRow>, StockError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = product_ids.iter().map(|id| id.get()).collect();
        let query = format!(
            "SELECT product_id, qty, stock_status FROM {GLOBAL_STOCK_TABLE} \
             WHERE product_id = ANY($1)"
        );
        let rows: Vec<(i64, BigDecimal, i16)> = sqlx::query_as(&query)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StockError::Storage(format!("Failed to read global stock rows: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(product_id, quantity, stock_status)| GlobalStockRow {
                product_id,
                quantity,
                is_salable: stock_status != 0,
            })
            .collect())
    }

    async fn scope_rows(&self, table: &str, skus: &[Sku]) -> Result<Vec<ScopeStockRow>, StockError> {
        if skus.is_empty() {
            return Ok(Vec::new());
        }

        let sku_list: Vec<String> = skus.iter().map(|sku| sku.as_str().to_string()).collect();
        let query = format!("SELECT sku, quantity, is_salable FROM {table} WHERE sku = ANY($1)");
        let rows: Vec<(String, BigDecimal, i16)> = sqlx::query_as(&query)
            .bind(&sku_list)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                StockError::Storage(format!("Failed to read stock rows from {table}: {e}"))
            })?;

        Ok(rows
            .into_iter()
            .map(|(sku, quantity, is_salable)| ScopeStockRow {
                sku,
                quantity,
                is_salable: is_salable != 0,
            })
            .collect())
    }
}

/// Legacy/global per-product stock flags.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cataloginventory_stock_item (
///     product_id BIGINT PRIMARY KEY,
///     qty NUMERIC NOT NULL,
///     is_in_stock SMALLINT NOT NULL
/// );
/// ```
#[derive(Clone)]
pub struct PgGlobalStockReader {
    pool: PgPool,
}

impl PgGlobalStockReader {
    /// Create a reader over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl GlobalStockReader for PgGlobalStockReader {
    async fn global_stock(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<GlobalStockItem>, StockError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = product_ids.iter().map(|id| id.get()).collect();
        let query = format!(
            "SELECT product_id, is_in_stock FROM {GLOBAL_STOCK_ITEM_TABLE} \
             WHERE product_id = ANY($1)"
        );
        let rows: Vec<(i64, i16)> = sqlx::query_as(&query)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StockError::Storage(format!("Failed to read global stock items: {e}")))?;

        let mut items = Vec::with_capacity(rows.len());
        for (product_id, is_in_stock) in rows {
            let Some(product_id) = ProductId::new(product_id) else {
                tracing::warn!(product_id, "Dropping stock item with malformed product id");
                continue;
            };
            items.push(GlobalStockItem {
                product_id,
                is_in_stock: is_in_stock != 0,
            });
        }
        Ok(items)
    }
}
