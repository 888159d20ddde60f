//! # StockSync Core
//!
//! Core types and collaborator traits for the StockSync MSI bridge.
//!
//! StockSync answers one question for downstream search indexing: *is this
//! product (including composite products with children) currently salable in
//! a given stock scope?* — and propagates inventory changes into a sync
//! queue. This crate holds the vocabulary both halves share:
//!
//! - **Identity types**: [`product::ProductId`], [`product::Sku`],
//!   [`scope::StockId`] and friends — strong newtypes in place of the host
//!   platform's loosely-typed ids.
//! - **Collaborator traits**: narrow seams onto the host catalog and
//!   inventory storage ([`catalog::SkuLookup`], [`stock::StockRowSource`],
//!   [`sync::ChangelogStore`], ...). Production implementations live in
//!   `stocksync-postgres`; deterministic in-memory fakes in
//!   `stocksync-testing`.
//! - **Error taxonomy**: one `thiserror` enum per concern, with storage
//!   faults wrapped as `String` payloads.
//!
//! The resolution engine itself (scope resolution, stock reads, composite
//! aggregation) lives in `stocksync-stock`; the changelog-driven sync
//! decider in `stocksync-indexer`.

pub mod catalog;
pub mod product;
pub mod scope;
pub mod stock;
pub mod sync;

pub use catalog::{CatalogError, SkuLookup, SourceItemLookup};
pub use product::{ProductId, ProductType, Sku, SourceItemId};
pub use scope::{
    SalesChannelStocks, ScopeError, StockId, Store, StoreId, StoreRegistry, Website, WebsiteId,
};
pub use stock::{
    BundleChildrenProvider, CompositeProduct, GlobalStockItem, GlobalStockReader, GlobalStockRow,
    IsProductSalable, MsiTableNaming, ScopeStockRow, StockError, StockIndexTables, StockItemData,
    StockItemRecord, StockRowSource, GLOBAL_STOCK_TABLE,
};
pub use sync::{
    ChangelogStore, IndexerCursorStore, IndexerError, IndexerState, QueueError, RecordType,
    SyncQueueDispatcher,
};
