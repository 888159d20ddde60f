//! Changelog, cursor and sync-queue collaborators.
//!
//! Incremental sync is changelog-driven: the inventory subsystem appends the
//! id of every mutated source item to a versioned changelog, and a persisted
//! cursor ([`IndexerState`]) marks the last version fully processed for a
//! named indexer. The decider in `stocksync-indexer` advances the cursor,
//! reads the version range, and hands translated product ids to the
//! [`SyncQueueDispatcher`].
//!
//! # Cursor Semantics
//!
//! - Exactly one live [`IndexerState`] per indexer id; overwritten, never
//!   appended.
//! - `version_id` is monotonically non-decreasing across successful runs.
//! - A failed save leaves the previous value intact, so the next run
//!   reprocesses the same range (at-least-once delivery; dispatch is
//!   idempotent at the product-id level).
//!
//! # Dyn Compatibility
//!
//! [`ChangelogStore`] and [`IndexerCursorStore`] use explicit
//! `Pin<Box<dyn Future>>` returns instead of `impl Future` to enable trait
//! object usage (`Arc<dyn ChangelogStore>`), as the sync decider takes them
//! as shared dependencies.

use crate::catalog::CatalogError;
use crate::product::{ProductId, SourceItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Persisted cursor marking the last changelog version fully processed for
/// a named indexer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerState {
    /// The indexer this cursor belongs to.
    pub view_id: String,
    /// Last changelog version fully processed.
    pub version_id: u64,
    /// When the cursor was last written.
    pub updated_at: DateTime<Utc>,
}

impl IndexerState {
    /// A fresh cursor at version 0 for a never-run indexer.
    #[must_use]
    pub fn new(view_id: impl Into<String>) -> Self {
        Self {
            view_id: view_id.into(),
            version_id: 0,
            updated_at: Utc::now(),
        }
    }

    /// Advance the cursor to the given version, stamping the update time.
    pub fn advance_to(&mut self, version_id: u64) {
        self.version_id = version_id;
        self.updated_at = Utc::now();
    }
}

/// Errors raised while deciding and dispatching a sync run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexerError {
    /// Changelog read fault.
    #[error("Changelog error: {0}")]
    Changelog(String),

    /// Cursor load/save fault.
    #[error("Cursor error: {0}")]
    Cursor(String),

    /// Source-item translation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Queue dispatch failed.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Errors raised by the downstream sync queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The queue rejected or failed to record the dispatch.
    #[error("Sync queue dispatch failed: {0}")]
    Dispatch(String),
}

/// Record types understood by the downstream sync queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// Catalog products.
    Products,
}

impl RecordType {
    /// The queue's wire string for this record type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
        }
    }
}

/// Read access to a versioned changelog of source-item mutations.
pub trait ChangelogStore: Send + Sync {
    /// The current maximum version recorded for the named view.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::Changelog`] on storage faults.
    fn latest_version(
        &self,
        view_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, IndexerError>> + Send + '_>>;

    /// Distinct entity ids recorded in `(from_version, to_version]`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::Changelog`] on storage faults.
    fn list_ids(
        &self,
        view_id: &str,
        from_version: u64,
        to_version: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SourceItemId>, IndexerError>> + Send + '_>>;
}

/// Persistence for [`IndexerState`] cursors.
pub trait IndexerCursorStore: Send + Sync {
    /// Load the cursor for the named indexer; a never-run indexer yields a
    /// fresh state at version 0.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::Cursor`] on storage faults.
    fn load(
        &self,
        view_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<IndexerState, IndexerError>> + Send + '_>>;

    /// Persist the cursor, overwriting the previous value atomically.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::Cursor`] on storage faults; the previously
    /// persisted value must remain intact in that case.
    fn save(
        &self,
        state: &IndexerState,
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexerError>> + Send + '_>>;
}

/// The downstream search-sync queue.
pub trait SyncQueueDispatcher: Send + Sync {
    /// Mark the given products for (re)sync.
    ///
    /// Dispatch is idempotent at the product-id level: enqueueing an id
    /// already pending is a no-op downstream.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Dispatch`] when the queue cannot record the
    /// products.
    fn enqueue(
        &self,
        product_ids: &[ProductId],
        record_type: RecordType,
    ) -> impl Future<Output = Result<(), QueueError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_starts_at_version_zero() {
        let state = IndexerState::new("product_sync_stock_msi");
        assert_eq!(state.view_id, "product_sync_stock_msi");
        assert_eq!(state.version_id, 0);
    }

    #[test]
    fn advance_moves_the_version_forward() {
        let mut state = IndexerState::new("product_sync_stock_msi");
        state.advance_to(42);
        assert_eq!(state.version_id, 42);
    }

    #[test]
    fn record_type_wire_string() {
        assert_eq!(RecordType::Products.as_str(), "products");
    }
}
