//! Raw stock item data reads, scope-aware.

use std::collections::HashMap;
use stocksync_core::catalog::SkuLookup;
use stocksync_core::product::{ProductId, Sku};
use stocksync_core::scope::StockId;
use stocksync_core::stock::{
    GlobalStockRow, ScopeStockRow, StockError, StockIndexTables, StockItemData, StockItemRecord,
    StockRowSource,
};

/// Reads salability/quantity rows for a set of products from the correct
/// storage location.
///
/// The default/global scope is keyed by product id in the legacy table;
/// every other scope is keyed by SKU in its own index table, so reads there
/// go through an id → SKU → id round trip. The SKU map is resolved fresh on
/// every call — the product → SKU association can change between runs.
///
/// Unlike the host platform's single-product reader, this one accepts id
/// lists, which the composite resolver needs for bundle option groups.
pub struct StockDataReader<S, R, T> {
    skus: S,
    rows: R,
    tables: T,
}

impl<S, R, T> StockDataReader<S, R, T>
where
    S: SkuLookup,
    R: StockRowSource,
    T: StockIndexTables,
{
    /// Create a reader over the given SKU lookup, row source and table
    /// naming.
    #[must_use]
    pub const fn new(skus: S, rows: R, tables: T) -> Self {
        Self { skus, rows, tables }
    }

    async fn read(
        &self,
        product_ids: &[ProductId],
        stock_id: StockId,
    ) -> Result<HashMap<ProductId, StockItemRecord>, StockError> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        if stock_id == self.tables.default_stock_id() {
            let rows = self.rows.global_rows(product_ids).await?;
            Ok(map_global_rows(rows))
        } else {
            let skus = self.skus.skus_by_product_ids(product_ids).await?;
            let table = self.tables.table_name(stock_id);
            let sku_list: Vec<Sku> = skus.values().cloned().collect();
            let rows = self.rows.scope_rows(&table, &sku_list).await?;
            Ok(map_scope_rows(rows, &skus))
        }
    }
}

impl<S, R, T> StockItemData for StockDataReader<S, R, T>
where
    S: SkuLookup,
    R: StockRowSource,
    T: StockIndexTables,
{
    async fn stock_item_data(
        &self,
        product_ids: &[ProductId],
        stock_id: StockId,
    ) -> Result<HashMap<ProductId, StockItemRecord>, StockError> {
        self.read(product_ids, stock_id).await
    }
}

fn map_global_rows(rows: Vec<GlobalStockRow>) -> HashMap<ProductId, StockItemRecord> {
    let mut data = HashMap::with_capacity(rows.len());
    for row in rows {
        let Some(product_id) = ProductId::new(row.product_id) else {
            tracing::warn!(
                product_id = row.product_id,
                "Dropping global stock row with malformed product id"
            );
            continue;
        };
        data.insert(
            product_id,
            StockItemRecord {
                quantity: row.quantity,
                is_salable: row.is_salable,
            },
        );
    }
    data
}

fn map_scope_rows(
    rows: Vec<ScopeStockRow>,
    skus: &HashMap<ProductId, Sku>,
) -> HashMap<ProductId, StockItemRecord> {
    // Reverse lookup over this call's SKU map only. A SKU mapping to more
    // than one requested product id is ambiguous and its rows are dropped.
    let mut reverse: HashMap<&str, Option<ProductId>> = HashMap::with_capacity(skus.len());
    for (product_id, sku) in skus {
        reverse
            .entry(sku.as_str())
            .and_modify(|slot| *slot = None)
            .or_insert(Some(*product_id));
    }

    let mut data = HashMap::with_capacity(rows.len());
    for row in rows {
        match reverse.get(row.sku.as_str()) {
            Some(Some(product_id)) => {
                data.insert(
                    *product_id,
                    StockItemRecord {
                        quantity: row.quantity,
                        is_salable: row.is_salable,
                    },
                );
            }
            Some(None) => {
                tracing::warn!(sku = %row.sku, "Dropping stock row with ambiguous SKU mapping");
            }
            None => {
                tracing::warn!(sku = %row.sku, "Dropping stock row for SKU outside the requested set");
            }
        }
    }
    data
}
