//! # StockSync Postgres
//!
//! `PostgreSQL` implementations of the storage-facing collaborator traits in
//! `stocksync-core`, using sqlx with runtime-built queries (the table names
//! involved — per-scope index tables, per-view changelog tables — are only
//! known at runtime).
//!
//! - [`PgCatalog`]: id↔SKU resolution and the source-item → product join
//! - [`PgStockRows`]: raw rows from the global and per-scope stock tables
//! - [`PgGlobalStockReader`]: legacy per-product stock flags
//! - [`PgChangelogStore`] / [`PgIndexerCursorStore`]: changelog reads and
//!   cursor persistence
//!
//! All implementations short-circuit on empty id/SKU lists without touching
//! the pool, and map storage faults into the core error enums with context.

pub mod catalog;
pub mod changelog;
pub mod stock;

pub use catalog::PgCatalog;
pub use changelog::{PgChangelogStore, PgIndexerCursorStore};
pub use stock::{PgGlobalStockReader, PgStockRows};
