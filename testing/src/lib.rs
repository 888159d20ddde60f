//! # StockSync Testing
//!
//! In-memory fakes for every collaborator trait in `stocksync-core`,
//! providing fast, deterministic testing infrastructure:
//!
//! - [`InMemoryCatalog`]: id↔SKU and source-item translation
//! - [`InMemoryStoreRegistry`] / [`InMemoryChannelStocks`]: scope resolution
//! - [`InMemoryStockRows`] / [`InMemoryGlobalStock`] / [`InMemoryStockItems`]
//!   / [`InMemoryBundleChildren`] / [`InMemorySalability`]: stock reads
//! - [`InMemoryChangelog`] / [`InMemoryCursorStore`] /
//!   [`RecordingDispatcher`]: changelog sync
//!
//! Every fake counts the storage-touching calls it receives (`*_count`
//! accessors), so tests can pin the "empty input makes zero storage calls"
//! contracts. Fakes on failure paths (`InMemoryCursorStore`,
//! `InMemoryStockItems`, `InMemoryBundleChildren`, `RecordingDispatcher`)
//! support failure injection via `fail_with`.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning is the only panic source

pub mod catalog_mocks;
pub mod scope_mocks;
pub mod stock_mocks;
pub mod sync_mocks;

pub use catalog_mocks::InMemoryCatalog;
pub use scope_mocks::{InMemoryChannelStocks, InMemoryStoreRegistry};
pub use stock_mocks::{
    InMemoryBundleChildren, InMemoryGlobalStock, InMemorySalability, InMemoryStockItems,
    InMemoryStockRows,
};
pub use sync_mocks::{InMemoryChangelog, InMemoryCursorStore, RecordingDispatcher};
