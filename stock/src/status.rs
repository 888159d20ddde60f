//! Bulk product salability façade.

use crate::scope::StockScopeResolver;
use std::collections::HashMap;
use stocksync_core::catalog::{CatalogError, SkuLookup};
use stocksync_core::product::{ProductId, Sku};
use stocksync_core::scope::{SalesChannelStocks, ScopeError, StockId, StoreRegistry, WebsiteId};
use stocksync_core::stock::IsProductSalable;
use thiserror::Error;

#[derive(Error, Debug)]
enum StatusLookupError {
    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Bulk façade over the host inventory's single-product salability
/// predicate: given product ids and an optional website, a salability map.
///
/// Degradation is all-or-nothing: if the stock scope or the SKU set cannot
/// be resolved, the whole batch resolves to an empty map ("unknown") rather
/// than misleading partial results. Individual predicate failures only
/// degrade their own product to `false`.
pub struct StockStatusById<R, C, S, P> {
    scopes: StockScopeResolver<R, C>,
    skus: S,
    salability: P,
}

impl<R, C, S, P> StockStatusById<R, C, S, P>
where
    R: StoreRegistry,
    C: SalesChannelStocks,
    S: SkuLookup,
    P: IsProductSalable,
{
    /// Create a façade over the given scope resolver, SKU lookup and
    /// salability predicate.
    #[must_use]
    pub const fn new(scopes: StockScopeResolver<R, C>, skus: S, salability: P) -> Self {
        Self {
            scopes,
            skus,
            salability,
        }
    }

    /// Salability per product id in the stock scope of the given website
    /// (or the default website, when `None`).
    ///
    /// Total over its input domain: empty input yields an empty map with no
    /// I/O, and resolution failures yield an empty map (logged).
    pub async fn stock_status_by_ids(
        &self,
        product_ids: &[ProductId],
        website_id: Option<WebsiteId>,
    ) -> HashMap<ProductId, bool> {
        if product_ids.is_empty() {
            return HashMap::new();
        }

        let (stock_id, skus) = match self.resolve_inputs(product_ids, website_id).await {
            Ok(resolved) => resolved,
            Err(error) => {
                tracing::error!(
                    ?website_id,
                    %error,
                    "Stock status lookup degraded to empty result"
                );
                return HashMap::new();
            }
        };

        let mut result = HashMap::with_capacity(skus.len());
        for (product_id, sku) in &skus {
            let salable = match self.salability.is_salable(sku, stock_id).await {
                Ok(salable) => salable,
                Err(error) => {
                    tracing::error!(%sku, %stock_id, %error, "Salability check failed");
                    false
                }
            };
            result.insert(*product_id, salable);
        }
        result
    }

    async fn resolve_inputs(
        &self,
        product_ids: &[ProductId],
        website_id: Option<WebsiteId>,
    ) -> Result<(StockId, HashMap<ProductId, Sku>), StatusLookupError> {
        let stock_id = self.scopes.try_stock_id_for_website(website_id).await?;
        let skus = self.skus.skus_by_product_ids(product_ids).await?;
        Ok((stock_id, skus))
    }
}
