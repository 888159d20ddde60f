//! End-to-end composite resolution through the real stock data reader:
//! catalog + raw rows underneath, composite rules on top.

#![allow(clippy::unwrap_used)] // Test code unwraps for clear failure points

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;
use stocksync_core::product::{ProductId, ProductType, Sku};
use stocksync_core::scope::StockId;
use stocksync_core::stock::{CompositeProduct, MsiTableNaming, ScopeStockRow};
use stocksync_stock::{CompositeStockResolver, StockDataReader};
use stocksync_testing::{
    InMemoryBundleChildren, InMemoryCatalog, InMemoryGlobalStock, InMemoryStockRows,
};

const SCOPE: StockId = StockId::new(4);
const SCOPE_TABLE: &str = "inventory_stock_4";

fn pid(value: i64) -> ProductId {
    ProductId::new(value).unwrap()
}

fn scope_row(sku: &str, quantity: i64, is_salable: bool) -> ScopeStockRow {
    ScopeStockRow {
        sku: sku.to_string(),
        quantity: BigDecimal::from(quantity),
        is_salable,
    }
}

struct Shop {
    catalog: InMemoryCatalog,
    rows: InMemoryStockRows,
    global: InMemoryGlobalStock,
    children: InMemoryBundleChildren,
}

impl Shop {
    /// A configurable (55) with a salable scope row, and a bundle (88) with
    /// one required group of two children (10, 11).
    fn new() -> Self {
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(pid(55), Sku::new("CONF-1"));
        catalog.insert_product(pid(88), Sku::new("BUNDLE-1"));
        catalog.insert_product(pid(10), Sku::new("PART-A"));
        catalog.insert_product(pid(11), Sku::new("PART-B"));

        let rows = InMemoryStockRows::new();
        rows.insert_scope_row(SCOPE_TABLE, scope_row("CONF-1", 12, true));
        rows.insert_scope_row(SCOPE_TABLE, scope_row("PART-A", 3, true));
        rows.insert_scope_row(SCOPE_TABLE, scope_row("PART-B", 0, false));

        let global = InMemoryGlobalStock::new();
        global.set_in_stock(pid(55), true);
        global.set_in_stock(pid(88), true);

        let children = InMemoryBundleChildren::new();
        children.set_children(
            pid(88),
            BTreeMap::from([(1, vec![pid(10), pid(11)])]),
        );

        Self {
            catalog,
            rows,
            global,
            children,
        }
    }

    fn resolver(
        &self,
    ) -> CompositeStockResolver<
        StockDataReader<InMemoryCatalog, InMemoryStockRows, MsiTableNaming>,
        InMemoryGlobalStock,
        InMemoryBundleChildren,
    > {
        CompositeStockResolver::new(
            StockDataReader::new(
                self.catalog.clone(),
                self.rows.clone(),
                MsiTableNaming::new(),
            ),
            self.global.clone(),
            self.children.clone(),
        )
    }
}

fn composite(id: i64, product_type: ProductType) -> CompositeProduct {
    CompositeProduct {
        id: ProductId::new(id),
        product_type,
        stock_item: None,
    }
}

#[tokio::test]
async fn configurable_resolves_through_the_scope_table() {
    let shop = Shop::new();
    let salable = shop
        .resolver()
        .execute(&composite(55, ProductType::Configurable), SCOPE)
        .await;
    assert!(salable);
}

#[tokio::test]
async fn bundle_with_one_salable_child_per_group_is_salable() {
    let shop = Shop::new();
    let salable = shop
        .resolver()
        .execute(&composite(88, ProductType::Bundle), SCOPE)
        .await;
    assert!(salable);
}

#[tokio::test]
async fn global_out_of_stock_gates_both_composite_types() {
    let shop = Shop::new();
    shop.global.set_in_stock(pid(55), false);
    shop.global.set_in_stock(pid(88), false);

    let resolver = shop.resolver();
    assert!(
        !resolver
            .execute(&composite(55, ProductType::Configurable), SCOPE)
            .await
    );
    assert!(
        !resolver
            .execute(&composite(88, ProductType::Bundle), SCOPE)
            .await
    );
}

#[tokio::test]
async fn bundle_fails_when_a_child_has_no_scope_row() {
    let shop = Shop::new();
    // Child 12 is known to the catalog but absent from the scope table.
    shop.catalog.insert_product(pid(12), Sku::new("PART-C"));
    shop.children.set_children(
        pid(88),
        BTreeMap::from([(1, vec![pid(10), pid(11), pid(12)])]),
    );

    let salable = shop
        .resolver()
        .execute(&composite(88, ProductType::Bundle), SCOPE)
        .await;
    assert!(!salable);
}

#[tokio::test]
async fn default_scope_reads_bypass_the_catalog() {
    let shop = Shop::new();
    shop.rows.insert_global_row(stocksync_core::stock::GlobalStockRow {
        product_id: 55,
        quantity: BigDecimal::from(12),
        is_salable: true,
    });

    let salable = shop
        .resolver()
        .execute(&composite(55, ProductType::Configurable), StockId::DEFAULT)
        .await;
    assert!(salable);
    assert_eq!(shop.catalog.lookup_count(), 0);
}
