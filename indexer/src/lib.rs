//! # StockSync Indexer
//!
//! Changelog-driven incremental sync: watches the inventory subsystem's
//! source-item changelog and marks the owning products for (re)sync in the
//! downstream search queue.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐   entity ids    ┌──────────────────┐
//! │   Changelog   │ ──────────────▶ │ StockSyncIndexer │
//! └───────────────┘                 └───┬──────────┬───┘
//!                                       │          │
//!                                       ▼          ▼
//!                                 ┌──────────┐ ┌────────────┐
//!                                 │  Cursor  │ │ Sync Queue │
//!                                 └──────────┘ └────────────┘
//! ```
//!
//! The cursor is advanced **before** the range is dispatched; a failed save
//! aborts the run without dispatching, so a subsequent run reprocesses the
//! same range. Dispatch is idempotent at the product-id level, making the
//! resulting at-least-once delivery safe.

pub mod stock_sync;

pub use stock_sync::{StockSyncIndexer, STOCK_SYNC_INDEXER_ID};
