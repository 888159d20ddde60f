//! Website/store → stock scope resolution.

use stocksync_core::scope::{
    SalesChannelStocks, ScopeError, StockId, StoreId, StoreRegistry, WebsiteId,
};

/// Resolves websites and stores to their stock scope.
///
/// Two boundaries with different failure contracts:
///
/// - [`stock_id_for_website`](Self::stock_id_for_website) never fails:
///   any resolution failure is logged and falls back to the default stock
///   id, so bulk callers (export, composite resolution) always get a usable
///   scope.
/// - [`stock_id_for_store`](Self::stock_id_for_store) propagates lookup
///   failures, because its query-building callers treat "cannot resolve" as
///   "leave the query untouched" and need to see the failure.
///
/// The fallible inner call is public
/// ([`try_stock_id_for_website`](Self::try_stock_id_for_website)) so the
/// never-throw contract stays auditable independently of logging.
pub struct StockScopeResolver<R, C> {
    registry: R,
    channels: C,
    default_stock_id: StockId,
}

impl<R, C> StockScopeResolver<R, C>
where
    R: StoreRegistry,
    C: SalesChannelStocks,
{
    /// Create a resolver over the given registry and channel assignments.
    #[must_use]
    pub const fn new(registry: R, channels: C) -> Self {
        Self {
            registry,
            channels,
            default_stock_id: StockId::DEFAULT,
        }
    }

    /// Override the platform's default stock id.
    #[must_use]
    pub const fn with_default_stock_id(mut self, stock_id: StockId) -> Self {
        self.default_stock_id = stock_id;
        self
    }

    /// The stock id used when website resolution fails.
    #[must_use]
    pub const fn default_stock_id(&self) -> StockId {
        self.default_stock_id
    }

    /// Resolve a website (or the current/default website, when `None`) to
    /// its stock scope.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] when the website is unknown or no stock is
    /// assigned to its sales channel.
    pub async fn try_stock_id_for_website(
        &self,
        website_id: Option<WebsiteId>,
    ) -> Result<StockId, ScopeError> {
        let website = self.registry.website(website_id).await?;
        self.channels.stock_for_website(&website.code).await
    }

    /// Resolve a website to its stock scope, falling back to the default
    /// stock id on any failure.
    pub async fn stock_id_for_website(&self, website_id: Option<WebsiteId>) -> StockId {
        match self.try_stock_id_for_website(website_id).await {
            Ok(stock_id) => stock_id,
            Err(error) => {
                tracing::error!(
                    ?website_id,
                    %error,
                    "Website stock resolution failed; using default stock"
                );
                self.default_stock_id
            }
        }
    }

    /// Resolve a store view to the stock scope of its website.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] when the store or its website is unknown, or
    /// no stock is assigned to the website's sales channel. Callers in
    /// query-building contexts treat this as "no-op".
    pub async fn stock_id_for_store(&self, store_id: StoreId) -> Result<StockId, ScopeError> {
        let store = self.registry.store(store_id).await?;
        let website = self.registry.website(Some(store.website_id)).await?;
        self.channels.stock_for_website(&website.code).await
    }
}
