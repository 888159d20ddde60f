//! Parent-stock join planning for catalog export queries.

use crate::scope::StockScopeResolver;
use stocksync_core::scope::{SalesChannelStocks, StoreId, StoreRegistry};
use stocksync_core::stock::{StockIndexTables, GLOBAL_STOCK_TABLE};

/// Alias under which the parent stock table is joined.
pub const PARENT_STOCK_TABLE_ALIAS: &str = "parent_stock_status_index";

/// How the stock table joins onto the export SELECT.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StockJoinType {
    /// `LEFT JOIN` — keep parents without stock rows.
    Left,
    /// `INNER JOIN` — drop parents without stock rows.
    Inner,
}

/// Which parent column matches the stock table key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StockJoinKey {
    /// Join `entity_id` against the global table's `product_id`.
    ProductId,
    /// Join `sku` against the per-scope index table's `sku`.
    Sku,
}

/// A computed parent-stock join, as a value the host query builder applies.
///
/// Keeping the decision separate from the SELECT mutation keeps it testable
/// without a query builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockJoinPlan {
    /// The stock table to join.
    pub table: String,
    /// Alias for the joined table.
    pub alias: &'static str,
    /// Left vs inner join.
    pub join_type: StockJoinType,
    /// Which parent column carries the join key.
    pub key: StockJoinKey,
    /// Salability column to project as `stock_status`, when the caller
    /// wants the flag returned.
    pub stock_column: Option<&'static str>,
    /// Restrict to salable rows (out-of-stock parents excluded).
    pub salable_only: bool,
}

/// Decides whether and how a catalog export SELECT must join parent stock
/// for a given store.
///
/// No join is required when out-of-stock products are included and the
/// stock flag is not wanted. An unresolvable store yields no plan and the
/// export query runs untouched.
pub struct ParentStockJoinPlanner<R, C, T> {
    scopes: StockScopeResolver<R, C>,
    tables: T,
}

impl<R, C, T> ParentStockJoinPlanner<R, C, T>
where
    R: StoreRegistry,
    C: SalesChannelStocks,
    T: StockIndexTables,
{
    /// Create a planner over the given scope resolver and table naming.
    #[must_use]
    pub const fn new(scopes: StockScopeResolver<R, C>, tables: T) -> Self {
        Self { scopes, tables }
    }

    /// The join plan for a store's export query, or `None` when no join is
    /// needed or the store cannot be resolved.
    pub async fn plan(
        &self,
        store_id: StoreId,
        include_oos_products: bool,
        return_stock: bool,
    ) -> Option<StockJoinPlan> {
        if include_oos_products && !return_stock {
            return None;
        }

        let stock_id = match self.scopes.stock_id_for_store(store_id).await {
            Ok(stock_id) => stock_id,
            Err(error) => {
                tracing::warn!(%store_id, %error, "Parent stock join skipped");
                return None;
            }
        };

        let (table, key, salable_column) = if stock_id == self.tables.default_stock_id() {
            (GLOBAL_STOCK_TABLE.to_string(), StockJoinKey::ProductId, "stock_status")
        } else {
            (
                self.tables.table_name(stock_id),
                StockJoinKey::Sku,
                "is_salable",
            )
        };

        Some(StockJoinPlan {
            table,
            alias: PARENT_STOCK_TABLE_ALIAS,
            join_type: if include_oos_products {
                StockJoinType::Left
            } else {
                StockJoinType::Inner
            },
            key,
            stock_column: return_stock.then_some(salable_column),
            salable_only: !include_oos_products,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use stocksync_core::scope::{StockId, Store, Website, WebsiteId};
    use stocksync_core::stock::MsiTableNaming;
    use stocksync_testing::{InMemoryChannelStocks, InMemoryStoreRegistry};

    fn planner(
        stock_id: StockId,
    ) -> ParentStockJoinPlanner<InMemoryStoreRegistry, InMemoryChannelStocks, MsiTableNaming> {
        let registry = InMemoryStoreRegistry::new();
        registry.insert_website(Website {
            id: WebsiteId::new(2),
            code: "base".to_string(),
        });
        registry.insert_store(Store {
            id: StoreId::new(7),
            website_id: WebsiteId::new(2),
        });
        let channels = InMemoryChannelStocks::new();
        channels.assign("base", stock_id);
        ParentStockJoinPlanner::new(
            StockScopeResolver::new(registry, channels),
            MsiTableNaming::new(),
        )
    }

    #[tokio::test]
    async fn no_join_when_oos_included_and_stock_not_returned() {
        let planner = planner(StockId::new(4));
        assert_eq!(planner.plan(StoreId::new(7), true, false).await, None);
    }

    #[tokio::test]
    async fn default_scope_joins_the_global_table_by_product_id() {
        let planner = planner(StockId::DEFAULT);
        let plan = planner.plan(StoreId::new(7), true, true).await.unwrap();
        assert_eq!(plan.table, GLOBAL_STOCK_TABLE);
        assert_eq!(plan.key, StockJoinKey::ProductId);
        assert_eq!(plan.join_type, StockJoinType::Left);
        assert_eq!(plan.stock_column, Some("stock_status"));
        assert!(!plan.salable_only);
    }

    #[tokio::test]
    async fn non_default_scope_joins_the_index_table_by_sku() {
        let planner = planner(StockId::new(4));
        let plan = planner.plan(StoreId::new(7), false, false).await.unwrap();
        assert_eq!(plan.table, "inventory_stock_4");
        assert_eq!(plan.key, StockJoinKey::Sku);
        assert_eq!(plan.join_type, StockJoinType::Inner);
        assert_eq!(plan.stock_column, None);
        assert!(plan.salable_only);
    }

    #[tokio::test]
    async fn unresolvable_store_yields_no_plan() {
        let planner = planner(StockId::new(4));
        assert_eq!(planner.plan(StoreId::new(404), false, true).await, None);
    }
}
