//! The stock sync indexer: changelog cursor management and queue dispatch.

use std::sync::Arc;
use stocksync_core::catalog::SourceItemLookup;
use stocksync_core::product::SourceItemId;
use stocksync_core::sync::{
    ChangelogStore, IndexerCursorStore, IndexerError, RecordType, SyncQueueDispatcher,
};

/// Indexer id the changelog view and cursor are registered under.
pub const STOCK_SYNC_INDEXER_ID: &str = "product_sync_stock_msi";

/// Computes the products affected by inventory source-item mutations and
/// marks them for sync.
///
/// Three lifecycle hooks mirror the host indexer contract:
///
/// - [`execute_full`](Self::execute_full): read the changelog range since
///   the persisted cursor, advance the cursor, dispatch.
/// - [`execute_list`](Self::execute_list) /
///   [`execute_row`](Self::execute_row): the given ids are source-item ids
///   handed over by the host scheduler; the changelog and cursor are not
///   consulted.
///
/// All modes translate source-item ids to the owning product ids and hand
/// the survivors to the sync queue; an empty translated set makes no queue
/// call at all.
pub struct StockSyncIndexer<L, Q> {
    changelog: Arc<dyn ChangelogStore>,
    cursor: Arc<dyn IndexerCursorStore>,
    products: L,
    queue: Q,
    indexer_id: String,
}

impl<L, Q> StockSyncIndexer<L, Q>
where
    L: SourceItemLookup,
    Q: SyncQueueDispatcher,
{
    /// Create an indexer over the given changelog, cursor store, product
    /// translation and sync queue.
    #[must_use]
    pub fn new(
        changelog: Arc<dyn ChangelogStore>,
        cursor: Arc<dyn IndexerCursorStore>,
        products: L,
        queue: Q,
    ) -> Self {
        Self {
            changelog,
            cursor,
            products,
            queue,
            indexer_id: STOCK_SYNC_INDEXER_ID.to_string(),
        }
    }

    /// Register the changelog view and cursor under a different indexer id.
    #[must_use]
    pub fn with_indexer_id(mut self, indexer_id: impl Into<String>) -> Self {
        self.indexer_id = indexer_id.into();
        self
    }

    /// The indexer id this instance runs under.
    #[must_use]
    pub fn indexer_id(&self) -> &str {
        &self.indexer_id
    }

    /// Full mode: process everything recorded since the persisted cursor.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError`] on changelog read, translation or dispatch
    /// faults. A cursor save failure is *not* an error to the caller: the
    /// run aborts without dispatching (logged), and the next run retries
    /// the same range.
    pub async fn execute_full(&self) -> Result<(), IndexerError> {
        let ids = self.ids_to_update().await?;
        self.execute_action(&ids).await
    }

    /// Partial mode: the given ids are source-item ids.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError`] on translation or dispatch faults.
    pub async fn execute_list(&self, source_item_ids: &[SourceItemId]) -> Result<(), IndexerError> {
        self.execute_action(source_item_ids).await
    }

    /// Row mode: a single source-item id.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError`] on translation or dispatch faults.
    pub async fn execute_row(&self, source_item_id: SourceItemId) -> Result<(), IndexerError> {
        self.execute_action(&[source_item_id]).await
    }

    async fn execute_action(&self, source_item_ids: &[SourceItemId]) -> Result<(), IndexerError> {
        let product_ids = self
            .products
            .product_ids_for_source_items(source_item_ids)
            .await?;
        if product_ids.is_empty() {
            return Ok(());
        }

        tracing::info!(
            indexer = %self.indexer_id,
            products = product_ids.len(),
            "Marking products for sync"
        );
        self.queue
            .enqueue(&product_ids, RecordType::Products)
            .await?;
        Ok(())
    }

    /// Load the cursor, advance it to the changelog head, and return the
    /// entity ids recorded in between.
    ///
    /// The cursor is persisted *before* the range is read: a save failure
    /// aborts the run with an empty range, leaving the old cursor intact so
    /// the next run reprocesses the same versions.
    async fn ids_to_update(&self) -> Result<Vec<SourceItemId>, IndexerError> {
        let mut state = self.cursor.load(&self.indexer_id).await?;
        let from_version = state.version_id;
        let to_version = self.changelog.latest_version(&self.indexer_id).await?;

        state.advance_to(to_version);
        if let Err(error) = self.cursor.save(&state).await {
            tracing::error!(
                indexer = %self.indexer_id,
                %error,
                "Failed to persist changelog cursor; dispatching nothing"
            );
            return Ok(Vec::new());
        }

        self.changelog
            .list_ids(&self.indexer_id, from_version, to_version)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use stocksync_core::product::{ProductId, Sku};
    use stocksync_testing::{
        InMemoryCatalog, InMemoryChangelog, InMemoryCursorStore, RecordingDispatcher,
    };

    fn pid(value: i64) -> ProductId {
        ProductId::new(value).unwrap()
    }

    fn sid(value: i64) -> SourceItemId {
        SourceItemId::new(value)
    }

    struct Fixture {
        changelog: Arc<InMemoryChangelog>,
        cursor: Arc<InMemoryCursorStore>,
        catalog: InMemoryCatalog,
        queue: RecordingDispatcher,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                changelog: Arc::new(InMemoryChangelog::new()),
                cursor: Arc::new(InMemoryCursorStore::new()),
                catalog: InMemoryCatalog::new(),
                queue: RecordingDispatcher::new(),
            }
        }

        fn indexer(&self) -> StockSyncIndexer<InMemoryCatalog, RecordingDispatcher> {
            StockSyncIndexer::new(
                self.changelog.clone(),
                self.cursor.clone(),
                self.catalog.clone(),
                self.queue.clone(),
            )
        }

        /// Two source items for product 55, one for product 77.
        fn seed_catalog(&self) {
            self.catalog.insert_product(pid(55), Sku::new("SKU-A"));
            self.catalog.insert_product(pid(77), Sku::new("SKU-B"));
            self.catalog.insert_source_item(sid(101), Sku::new("SKU-A"));
            self.catalog.insert_source_item(sid(102), Sku::new("SKU-A"));
            self.catalog.insert_source_item(sid(103), Sku::new("SKU-B"));
        }
    }

    #[tokio::test]
    async fn full_run_dispatches_the_distinct_owning_products() {
        let fixture = Fixture::new();
        fixture.seed_catalog();
        fixture.changelog.append(STOCK_SYNC_INDEXER_ID, 1, sid(101));
        fixture.changelog.append(STOCK_SYNC_INDEXER_ID, 2, sid(102));
        fixture.changelog.append(STOCK_SYNC_INDEXER_ID, 3, sid(103));

        fixture.indexer().execute_full().await.unwrap();

        let (ids, record_type) = fixture.queue.last_dispatch().unwrap();
        assert_eq!(ids, vec![pid(55), pid(77)]);
        assert_eq!(record_type, RecordType::Products);
        assert_eq!(
            fixture
                .cursor
                .state(STOCK_SYNC_INDEXER_ID)
                .unwrap()
                .version_id,
            3
        );
    }

    #[tokio::test]
    async fn second_run_with_no_new_versions_dispatches_nothing() {
        let fixture = Fixture::new();
        fixture.seed_catalog();
        fixture.changelog.append(STOCK_SYNC_INDEXER_ID, 1, sid(101));

        let indexer = fixture.indexer();
        indexer.execute_full().await.unwrap();
        assert_eq!(fixture.queue.dispatch_count(), 1);

        indexer.execute_full().await.unwrap();
        assert_eq!(fixture.queue.dispatch_count(), 1);
    }

    #[tokio::test]
    async fn cursor_save_failure_aborts_without_dispatching() {
        let fixture = Fixture::new();
        fixture.seed_catalog();
        fixture.changelog.append(STOCK_SYNC_INDEXER_ID, 1, sid(101));
        fixture.cursor.fail_saves("deadlock");

        fixture.indexer().execute_full().await.unwrap();

        assert_eq!(fixture.queue.dispatch_count(), 0);
        assert_eq!(fixture.cursor.state(STOCK_SYNC_INDEXER_ID), None);
    }

    #[tokio::test]
    async fn failed_run_is_reprocessed_by_the_next_one() {
        let fixture = Fixture::new();
        fixture.seed_catalog();
        fixture.changelog.append(STOCK_SYNC_INDEXER_ID, 1, sid(101));

        fixture.cursor.fail_saves("deadlock");
        let indexer = fixture.indexer();
        indexer.execute_full().await.unwrap();
        assert_eq!(fixture.queue.dispatch_count(), 0);

        fixture.cursor.clear_save_failure();
        indexer.execute_full().await.unwrap();

        let (ids, _) = fixture.queue.last_dispatch().unwrap();
        assert_eq!(ids, vec![pid(55)]);
        assert_eq!(
            fixture
                .cursor
                .state(STOCK_SYNC_INDEXER_ID)
                .unwrap()
                .version_id,
            1
        );
    }

    #[tokio::test]
    async fn list_mode_skips_the_changelog_and_cursor() {
        let fixture = Fixture::new();
        fixture.seed_catalog();

        fixture
            .indexer()
            .execute_list(&[sid(101), sid(103)])
            .await
            .unwrap();

        let (ids, _) = fixture.queue.last_dispatch().unwrap();
        assert_eq!(ids, vec![pid(55), pid(77)]);
        assert_eq!(fixture.changelog.read_count(), 0);
        assert_eq!(fixture.cursor.state(STOCK_SYNC_INDEXER_ID), None);
    }

    #[tokio::test]
    async fn row_mode_translates_a_single_source_item() {
        let fixture = Fixture::new();
        fixture.seed_catalog();

        fixture.indexer().execute_row(sid(103)).await.unwrap();

        let (ids, _) = fixture.queue.last_dispatch().unwrap();
        assert_eq!(ids, vec![pid(77)]);
    }

    #[tokio::test]
    async fn unknown_source_items_dispatch_nothing() {
        let fixture = Fixture::new();
        fixture.seed_catalog();

        fixture.indexer().execute_row(sid(999)).await.unwrap();

        assert_eq!(fixture.queue.dispatch_count(), 0);
    }

    #[tokio::test]
    async fn custom_indexer_id_scopes_changelog_and_cursor() {
        let fixture = Fixture::new();
        fixture.seed_catalog();
        fixture.changelog.append("other_view", 1, sid(101));

        let indexer = fixture.indexer().with_indexer_id("other_view");
        indexer.execute_full().await.unwrap();

        assert_eq!(fixture.queue.dispatch_count(), 1);
        assert_eq!(fixture.cursor.state("other_view").unwrap().version_id, 1);
        assert_eq!(fixture.cursor.state(STOCK_SYNC_INDEXER_ID), None);
    }
}
