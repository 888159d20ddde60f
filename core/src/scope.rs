//! Stock scopes and sales-channel resolution collaborators.
//!
//! A *stock scope* is the unit at which salability is evaluated: an
//! aggregation of inventory sources assigned to a sales channel. Every
//! website resolves to exactly one stock scope at any time; the distinguished
//! default scope maps onto the legacy global stock table instead of a
//! per-scope index table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Stock scope identifier.
///
/// `StockId::DEFAULT` (1, by platform convention) designates the global
/// scope backed by the legacy stock table; all other ids map to
/// scope-specific index tables named deterministically from the id (see
/// [`crate::stock::StockIndexTables`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockId(i32);

impl StockId {
    /// The platform's designated default/global stock scope.
    pub const DEFAULT: Self = Self(1);

    /// Create a stock id.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw id.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for StockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Website identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebsiteId(i64);

impl WebsiteId {
    /// Create a website id.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for WebsiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store (store view) identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(i64);

impl StoreId {
    /// Create a store id.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A website as seen by the scope resolver: its id and the sales-channel
/// code stocks are assigned against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Website {
    /// Website id.
    pub id: WebsiteId,
    /// Sales-channel code of the website.
    pub code: String,
}

/// A store view and the website it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Store {
    /// Store id.
    pub id: StoreId,
    /// Owning website.
    pub website_id: WebsiteId,
}

/// Errors raised while resolving websites, stores and their stock scopes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The website (or the default website, when none was given) is missing
    /// from the store registry.
    #[error("Website not found in store registry")]
    WebsiteNotFound {
        /// The id that failed to resolve; `None` for the default website.
        website_id: Option<WebsiteId>,
    },

    /// The store is missing from the store registry.
    #[error("Store {0} not found in store registry")]
    StoreNotFound(StoreId),

    /// No stock is assigned to the website's sales channel.
    #[error("No stock assigned to sales channel '{0}'")]
    NoStockForChannel(String),

    /// Registry or storage fault during lookup.
    #[error("Scope lookup failed: {0}")]
    Lookup(String),
}

/// Read access to the host platform's website/store registry.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to be shared across async tasks.
pub trait StoreRegistry: Send + Sync {
    /// Resolve a website; `None` means the current/default website.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::WebsiteNotFound`] when the website (or default
    /// website) does not exist, [`ScopeError::Lookup`] on storage faults.
    fn website(
        &self,
        website_id: Option<WebsiteId>,
    ) -> impl Future<Output = Result<Website, ScopeError>> + Send;

    /// Resolve a store view.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::StoreNotFound`] when the store does not exist,
    /// [`ScopeError::Lookup`] on storage faults.
    fn store(&self, store_id: StoreId) -> impl Future<Output = Result<Store, ScopeError>> + Send;
}

/// Resolution of a website sales channel to its assigned stock.
pub trait SalesChannelStocks: Send + Sync {
    /// The stock assigned to the website sales channel with the given code.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NoStockForChannel`] when no stock is assigned,
    /// [`ScopeError::Lookup`] on storage faults.
    fn stock_for_website(
        &self,
        website_code: &str,
    ) -> impl Future<Output = Result<StockId, ScopeError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stock_id_is_one() {
        assert_eq!(StockId::DEFAULT.value(), 1);
        assert_eq!(StockId::new(1), StockId::DEFAULT);
    }

    #[test]
    fn display_renders_raw_values() {
        assert_eq!(format!("{}", StockId::new(3)), "3");
        assert_eq!(format!("{}", WebsiteId::new(5)), "5");
        assert_eq!(format!("{}", StoreId::new(7)), "7");
    }

    #[test]
    fn scope_error_messages_name_the_subject() {
        let error = ScopeError::StoreNotFound(StoreId::new(9));
        assert_eq!(error.to_string(), "Store 9 not found in store registry");

        let error = ScopeError::NoStockForChannel("base".to_string());
        assert_eq!(
            error.to_string(),
            "No stock assigned to sales channel 'base'"
        );
    }
}
