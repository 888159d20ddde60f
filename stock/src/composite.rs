//! Composite-product stock resolution.

use std::collections::HashMap;
use stocksync_core::product::{ProductId, ProductType};
use stocksync_core::scope::StockId;
use stocksync_core::stock::{
    BundleChildrenProvider, CompositeProduct, GlobalStockItem, GlobalStockReader, StockError,
    StockItemData, StockItemRecord,
};
use thiserror::Error;

/// Internal failure modes of a composite resolution.
///
/// Never crosses [`CompositeStockResolver::execute`]: the boundary logs and
/// resolves to "not salable". Kept as a distinct type so the suppression
/// contract is testable independently of logging.
#[derive(Error, Debug)]
pub enum CompositeStatusError {
    /// The product is neither configurable nor bundle.
    #[error("Incorrect product type, must be either configurable or bundle; {0} provided")]
    InvalidProductType(String),

    /// A stock or child lookup failed underneath.
    #[error(transparent)]
    Stock(#[from] StockError),
}

/// Determines overall salability for configurable and bundle products.
///
/// The host platform's per-scope index rows do not encode the composite
/// rule: a composite's own row reflects only child aggregation, while its
/// own in-stock flag lives in the legacy global tables. Salability here is a
/// two-tier gate:
///
/// 1. the product's **own global flag** must be in stock (preferring a
///    caller-attached stock item over a fresh read), and
/// 2. the **scope-specific** child aggregation must pass:
///    - configurable: the parent's per-scope row exists and is salable;
///    - bundle: every non-zero option group has a stock row for each child
///      and at least one salable child. Group `0` (the merged non-required
///      groups) never gates the bundle.
///
/// A product whose global stock row cannot be fetched at all is assumed in
/// stock; downstream sync depends on this permissive default.
pub struct CompositeStockResolver<D, G, B> {
    stock_data: D,
    global_stock: G,
    bundle_children: B,
}

impl<D, G, B> CompositeStockResolver<D, G, B>
where
    D: StockItemData,
    G: GlobalStockReader,
    B: BundleChildrenProvider,
{
    /// Create a resolver over the given stock data, global flags and bundle
    /// child enumeration.
    #[must_use]
    pub const fn new(stock_data: D, global_stock: G, bundle_children: B) -> Self {
        Self {
            stock_data,
            global_stock,
            bundle_children,
        }
    }

    /// Overall salability of a composite product in the given stock scope.
    ///
    /// Total over its input domain: failures are logged and resolve to
    /// `false`.
    pub async fn execute(&self, product: &CompositeProduct, stock_id: StockId) -> bool {
        match self.resolve(product, stock_id).await {
            Ok(salable) => salable,
            Err(error) => {
                tracing::error!(
                    product_id = ?product.id,
                    product_type = %product.product_type,
                    %stock_id,
                    %error,
                    "Composite stock resolution failed"
                );
                false
            }
        }
    }

    /// Fallible core of [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Returns [`CompositeStatusError`] for non-composite product types and
    /// for stock/child lookup faults.
    pub async fn resolve(
        &self,
        product: &CompositeProduct,
        stock_id: StockId,
    ) -> Result<bool, CompositeStatusError> {
        let is_bundle = match &product.product_type {
            ProductType::Configurable => false,
            ProductType::Bundle => true,
            other => {
                return Err(CompositeStatusError::InvalidProductType(
                    other.code().to_string(),
                ));
            }
        };

        let Some(product_id) = product.id else {
            return Ok(false);
        };
        if !self.in_stock_globally(product, product_id).await? {
            return Ok(false);
        }

        if is_bundle {
            self.bundle_in_stock(product_id, stock_id).await
        } else {
            self.configurable_in_stock(product_id, stock_id).await
        }
    }

    /// The product's own global flag: composite stock status is still
    /// global with MSI, so this gates the per-scope index rows, which do not
    /// take it into account.
    async fn in_stock_globally(
        &self,
        product: &CompositeProduct,
        product_id: ProductId,
    ) -> Result<bool, CompositeStatusError> {
        let stock_item: Option<GlobalStockItem> = match &product.stock_item {
            Some(item) => Some(item.clone()),
            None => self
                .global_stock
                .global_stock(&[product_id])
                .await?
                .into_iter()
                .next(),
        };

        // Assume in stock when the stock item cannot be checked at all.
        Ok(stock_item.is_none_or(|item| item.is_in_stock))
    }

    async fn configurable_in_stock(
        &self,
        product_id: ProductId,
        stock_id: StockId,
    ) -> Result<bool, CompositeStatusError> {
        // The per-scope row for a configurable already aggregates its
        // children; only the global gate above is missing from it.
        let data = self
            .stock_data
            .stock_item_data(&[product_id], stock_id)
            .await?;
        Ok(data
            .get(&product_id)
            .is_some_and(|record| record.is_salable))
    }

    async fn bundle_in_stock(
        &self,
        product_id: ProductId,
        stock_id: StockId,
    ) -> Result<bool, CompositeStatusError> {
        let children = self
            .bundle_children
            .children_by_group(product_id, true)
            .await?;

        // A bundle must have at least one option group to be salable.
        let mut salable = false;
        for (group_id, child_ids) in &children {
            if *group_id == 0 {
                // Group 0 merges all non-required groups; stock in those
                // never gates the bundle.
                salable = true;
                continue;
            }
            let data = self.stock_data.stock_item_data(child_ids, stock_id).await?;
            salable = has_rows_for_all(child_ids, &data) && has_salable_row(&data);
            if !salable {
                break;
            }
        }
        Ok(salable)
    }
}

fn has_rows_for_all(child_ids: &[ProductId], data: &HashMap<ProductId, StockItemRecord>) -> bool {
    !child_ids.is_empty() && data.len() == child_ids.len()
}

fn has_salable_row(data: &HashMap<ProductId, StockItemRecord>) -> bool {
    data.values().any(|record| record.is_salable)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::collections::BTreeMap;
    use stocksync_testing::{InMemoryBundleChildren, InMemoryGlobalStock, InMemoryStockItems};

    const SCOPE: StockId = StockId::new(4);

    fn pid(value: i64) -> ProductId {
        ProductId::new(value).unwrap()
    }

    fn record(is_salable: bool) -> StockItemRecord {
        StockItemRecord {
            quantity: BigDecimal::from(if is_salable { 5 } else { 0 }),
            is_salable,
        }
    }

    fn configurable(id: i64) -> CompositeProduct {
        CompositeProduct {
            id: ProductId::new(id),
            product_type: ProductType::Configurable,
            stock_item: None,
        }
    }

    fn bundle(id: i64) -> CompositeProduct {
        CompositeProduct {
            id: ProductId::new(id),
            product_type: ProductType::Bundle,
            stock_item: None,
        }
    }

    struct Fixture {
        stock_items: InMemoryStockItems,
        global: InMemoryGlobalStock,
        children: InMemoryBundleChildren,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                stock_items: InMemoryStockItems::new(),
                global: InMemoryGlobalStock::new(),
                children: InMemoryBundleChildren::new(),
            }
        }

        fn resolver(
            &self,
        ) -> CompositeStockResolver<InMemoryStockItems, InMemoryGlobalStock, InMemoryBundleChildren>
        {
            CompositeStockResolver::new(
                self.stock_items.clone(),
                self.global.clone(),
                self.children.clone(),
            )
        }
    }

    #[tokio::test]
    async fn non_composite_types_resolve_to_not_salable() {
        let fixture = Fixture::new();
        let product = CompositeProduct {
            id: ProductId::new(55),
            product_type: ProductType::Simple,
            stock_item: None,
        };
        assert!(!fixture.resolver().execute(&product, SCOPE).await);

        let error = fixture
            .resolver()
            .resolve(&product, SCOPE)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            CompositeStatusError::InvalidProductType(code) if code == "simple"
        ));
    }

    #[tokio::test]
    async fn product_without_id_is_not_salable() {
        let fixture = Fixture::new();
        let product = CompositeProduct {
            id: None,
            product_type: ProductType::Configurable,
            stock_item: None,
        };
        assert!(!fixture.resolver().execute(&product, SCOPE).await);
    }

    #[tokio::test]
    async fn configurable_needs_global_flag_and_salable_scope_row() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(55), true);
        fixture.stock_items.insert(SCOPE, pid(55), record(true));

        assert!(fixture.resolver().execute(&configurable(55), SCOPE).await);
    }

    #[tokio::test]
    async fn configurable_out_of_stock_globally_ignores_the_scope_row() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(55), false);
        fixture.stock_items.insert(SCOPE, pid(55), record(true));

        assert!(!fixture.resolver().execute(&configurable(55), SCOPE).await);
    }

    #[tokio::test]
    async fn configurable_without_scope_row_is_not_salable() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(55), true);

        assert!(!fixture.resolver().execute(&configurable(55), SCOPE).await);
    }

    #[tokio::test]
    async fn attached_stock_item_suppresses_the_global_read() {
        let fixture = Fixture::new();
        fixture.stock_items.insert(SCOPE, pid(55), record(true));

        let mut product = configurable(55);
        product.stock_item = Some(GlobalStockItem {
            product_id: pid(55),
            is_in_stock: true,
        });

        assert!(fixture.resolver().execute(&product, SCOPE).await);
        assert_eq!(fixture.global.read_count(), 0);
    }

    #[tokio::test]
    async fn missing_global_row_is_assumed_in_stock() {
        // Permissive default: products whose stock item cannot be checked
        // at all pass the global gate.
        let fixture = Fixture::new();
        fixture.stock_items.insert(SCOPE, pid(55), record(true));

        assert!(fixture.resolver().execute(&configurable(55), SCOPE).await);
    }

    #[tokio::test]
    async fn bundle_with_one_required_group_and_all_children_salable() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(88), true);
        fixture
            .children
            .set_children(pid(88), BTreeMap::from([(1, vec![pid(10), pid(11)])]));
        fixture.stock_items.insert(SCOPE, pid(10), record(true));
        fixture.stock_items.insert(SCOPE, pid(11), record(true));

        assert!(fixture.resolver().execute(&bundle(88), SCOPE).await);
    }

    #[tokio::test]
    async fn bundle_group_with_one_salable_child_is_satisfied() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(88), true);
        fixture
            .children
            .set_children(pid(88), BTreeMap::from([(1, vec![pid(10), pid(11)])]));
        fixture.stock_items.insert(SCOPE, pid(10), record(true));
        fixture.stock_items.insert(SCOPE, pid(11), record(false));

        assert!(fixture.resolver().execute(&bundle(88), SCOPE).await);
    }

    #[tokio::test]
    async fn bundle_child_without_stock_row_fails_the_group() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(88), true);
        fixture
            .children
            .set_children(pid(88), BTreeMap::from([(1, vec![pid(10), pid(11)])]));
        fixture.stock_items.insert(SCOPE, pid(10), record(true));

        assert!(!fixture.resolver().execute(&bundle(88), SCOPE).await);
    }

    #[tokio::test]
    async fn bundle_group_with_no_salable_children_fails() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(88), true);
        fixture
            .children
            .set_children(pid(88), BTreeMap::from([(1, vec![pid(10), pid(11)])]));
        fixture.stock_items.insert(SCOPE, pid(10), record(false));
        fixture.stock_items.insert(SCOPE, pid(11), record(false));

        assert!(!fixture.resolver().execute(&bundle(88), SCOPE).await);
    }

    #[tokio::test]
    async fn bundle_with_only_the_merged_optional_group_is_salable() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(88), true);
        fixture
            .children
            .set_children(pid(88), BTreeMap::from([(0, vec![pid(10), pid(11)])]));

        assert!(fixture.resolver().execute(&bundle(88), SCOPE).await);
    }

    #[tokio::test]
    async fn optional_group_never_gates_a_salable_required_group() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(88), true);
        fixture.children.set_children(
            pid(88),
            BTreeMap::from([(0, vec![pid(20)]), (1, vec![pid(10)])]),
        );
        // No stock data at all for the optional child 20.
        fixture.stock_items.insert(SCOPE, pid(10), record(true));

        assert!(fixture.resolver().execute(&bundle(88), SCOPE).await);
    }

    #[tokio::test]
    async fn bundle_with_no_groups_is_not_salable() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(88), true);
        fixture.children.set_children(pid(88), BTreeMap::new());

        assert!(!fixture.resolver().execute(&bundle(88), SCOPE).await);
    }

    #[tokio::test]
    async fn one_failing_group_fails_the_bundle() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(88), true);
        fixture.children.set_children(
            pid(88),
            BTreeMap::from([(1, vec![pid(10)]), (2, vec![pid(12)])]),
        );
        fixture.stock_items.insert(SCOPE, pid(10), record(true));
        fixture.stock_items.insert(SCOPE, pid(12), record(false));

        assert!(!fixture.resolver().execute(&bundle(88), SCOPE).await);
    }

    #[tokio::test]
    async fn child_lookup_failure_resolves_to_not_salable() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(88), true);
        fixture.children.fail_with("connection lost");

        assert!(!fixture.resolver().execute(&bundle(88), SCOPE).await);
    }

    #[tokio::test]
    async fn stock_data_failure_resolves_to_not_salable() {
        let fixture = Fixture::new();
        fixture.global.set_in_stock(pid(55), true);
        fixture.stock_items.fail_with("connection lost");

        assert!(!fixture.resolver().execute(&configurable(55), SCOPE).await);
    }
}
