//! In-memory changelog, cursor and dispatcher fakes.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use stocksync_core::product::{ProductId, SourceItemId};
use stocksync_core::sync::{
    ChangelogStore, IndexerCursorStore, IndexerError, IndexerState, QueueError, RecordType,
    SyncQueueDispatcher,
};

/// In-memory versioned changelog of source-item mutations.
#[derive(Clone, Debug, Default)]
pub struct InMemoryChangelog {
    entries: Arc<RwLock<HashMap<String, Vec<(u64, SourceItemId)>>>>,
    reads: Arc<RwLock<usize>>,
}

impl InMemoryChangelog {
    /// Create an empty changelog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the given version for the named view.
    pub fn append(&self, view_id: impl Into<String>, version: u64, entity_id: SourceItemId) {
        self.entries
            .write()
            .unwrap()
            .entry(view_id.into())
            .or_default()
            .push((version, entity_id));
    }

    /// Number of changelog reads performed so far.
    #[must_use]
    pub fn read_count(&self) -> usize {
        *self.reads.read().unwrap()
    }

    fn record_read(&self) {
        *self.reads.write().unwrap() += 1;
    }
}

impl ChangelogStore for InMemoryChangelog {
    fn latest_version(
        &self,
        view_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, IndexerError>> + Send + '_>> {
        let view_id = view_id.to_string();
        Box::pin(async move {
            self.record_read();
            Ok(self
                .entries
                .read()
                .unwrap()
                .get(&view_id)
                .into_iter()
                .flatten()
                .map(|(version, _)| *version)
                .max()
                .unwrap_or(0))
        })
    }

    fn list_ids(
        &self,
        view_id: &str,
        from_version: u64,
        to_version: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SourceItemId>, IndexerError>> + Send + '_>> {
        let view_id = view_id.to_string();
        Box::pin(async move {
            self.record_read();
            let entries = self.entries.read().unwrap();
            let mut seen = HashSet::new();
            let mut ids = Vec::new();
            for (version, entity_id) in entries.get(&view_id).into_iter().flatten() {
                if *version > from_version && *version <= to_version && seen.insert(*entity_id) {
                    ids.push(*entity_id);
                }
            }
            Ok(ids)
        })
    }
}

/// In-memory cursor store with injectable save failure, for exercising the
/// at-least-once contract.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCursorStore {
    states: Arc<RwLock<HashMap<String, IndexerState>>>,
    save_error: Arc<RwLock<Option<String>>>,
}

impl InMemoryCursorStore {
    /// Create an empty cursor store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The persisted cursor for the named indexer, if any.
    #[must_use]
    pub fn state(&self, view_id: &str) -> Option<IndexerState> {
        self.states.read().unwrap().get(view_id).cloned()
    }

    /// Make every subsequent save fail with the given message, leaving the
    /// persisted value untouched.
    pub fn fail_saves(&self, message: impl Into<String>) {
        *self.save_error.write().unwrap() = Some(message.into());
    }

    /// Let saves succeed again.
    pub fn clear_save_failure(&self) {
        *self.save_error.write().unwrap() = None;
    }
}

impl IndexerCursorStore for InMemoryCursorStore {
    fn load(
        &self,
        view_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<IndexerState, IndexerError>> + Send + '_>> {
        let view_id = view_id.to_string();
        Box::pin(async move {
            Ok(self
                .states
                .read()
                .unwrap()
                .get(&view_id)
                .cloned()
                .unwrap_or_else(|| IndexerState::new(view_id)))
        })
    }

    fn save(
        &self,
        state: &IndexerState,
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexerError>> + Send + '_>> {
        let state = state.clone();
        Box::pin(async move {
            if let Some(message) = self.save_error.read().unwrap().clone() {
                return Err(IndexerError::Cursor(message));
            }
            self.states
                .write()
                .unwrap()
                .insert(state.view_id.clone(), state);
            Ok(())
        })
    }
}

/// Recording sync-queue dispatcher.
#[derive(Clone, Debug, Default)]
pub struct RecordingDispatcher {
    dispatches: Arc<RwLock<Vec<(Vec<ProductId>, RecordType)>>>,
    error: Arc<RwLock<Option<String>>>,
}

impl RecordingDispatcher {
    /// Create a dispatcher that records every enqueue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dispatches recorded so far.
    #[must_use]
    pub fn dispatch_count(&self) -> usize {
        self.dispatches.read().unwrap().len()
    }

    /// All recorded dispatches, in order.
    #[must_use]
    pub fn dispatches(&self) -> Vec<(Vec<ProductId>, RecordType)> {
        self.dispatches.read().unwrap().clone()
    }

    /// The most recent dispatch, if any.
    #[must_use]
    pub fn last_dispatch(&self) -> Option<(Vec<ProductId>, RecordType)> {
        self.dispatches.read().unwrap().last().cloned()
    }

    /// Make every subsequent enqueue fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.error.write().unwrap() = Some(message.into());
    }
}

impl SyncQueueDispatcher for RecordingDispatcher {
    async fn enqueue(
        &self,
        product_ids: &[ProductId],
        record_type: RecordType,
    ) -> Result<(), QueueError> {
        if let Some(message) = self.error.read().unwrap().clone() {
            return Err(QueueError::Dispatch(message));
        }
        self.dispatches
            .write()
            .unwrap()
            .push((product_ids.to_vec(), record_type));
        Ok(())
    }
}
