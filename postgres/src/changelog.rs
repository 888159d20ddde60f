//! Changelog reads and cursor persistence.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use std::future::Future;
use std::pin::Pin;
use stocksync_core::product::SourceItemId;
use stocksync_core::sync::{ChangelogStore, IndexerCursorStore, IndexerError, IndexerState};

/// Default name of the cursor state table.
pub const CURSOR_TABLE: &str = "mview_state";

/// The host platform's `<view_id>_cl` changelog naming.
#[must_use]
pub fn changelog_table_name(view_id: &str) -> String {
    format!("{view_id}_cl")
}

/// Versioned changelog reads over the host platform's per-view `_cl`
/// tables.
///
/// # Schema
///
/// ```sql
/// -- one per indexer view, named <view_id>_cl; appended to by the
/// -- inventory subsystem, truncated by the host's changelog rollover
/// CREATE TABLE product_sync_stock_msi_cl (
///     version_id BIGSERIAL PRIMARY KEY,
///     entity_id BIGINT NOT NULL
/// );
/// ```
#[derive(Clone)]
pub struct PgChangelogStore {
    pool: PgPool,
}

impl PgChangelogStore {
    /// Create a changelog store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ChangelogStore for PgChangelogStore {
    fn latest_version(
        &self,
        view_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, IndexerError>> + Send + '_>> {
        let table = changelog_table_name(view_id);
        Box::pin(async move {
            let query = format!("SELECT COALESCE(MAX(version_id), 0) FROM {table}");
            let (version,): (i64,) = sqlx::query_as(&query)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    IndexerError::Changelog(format!("Failed to read {table} version: {e}"))
                })?;
            Ok(u64::try_from(version).unwrap_or(0))
        })
    }

    fn list_ids(
        &self,
        view_id: &str,
        from_version: u64,
        to_version: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SourceItemId>, IndexerError>> + Send + '_>> {
        let table = changelog_table_name(view_id);
        Box::pin(async move {
            // Versions fit BIGINT by construction (BIGSERIAL source).
            #[allow(clippy::cast_possible_wrap)]
            let from = from_version as i64;
            #[allow(clippy::cast_possible_wrap)]
            let to = to_version as i64;

            let query = format!(
                "SELECT DISTINCT entity_id FROM {table} \
                 WHERE version_id > $1 AND version_id <= $2 \
                 ORDER BY entity_id"
            );
            let rows: Vec<(i64,)> = sqlx::query_as(&query)
                .bind(from)
                .bind(to)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    IndexerError::Changelog(format!("Failed to read {table} entries: {e}"))
                })?;

            Ok(rows
                .into_iter()
                .map(|(entity_id,)| SourceItemId::new(entity_id))
                .collect())
        })
    }
}

/// Cursor persistence in the host indexer state table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE mview_state (
///     view_id TEXT PRIMARY KEY,
///     version_id BIGINT NOT NULL,
///     updated TIMESTAMPTZ NOT NULL
/// );
/// ```
///
/// The cursor is overwritten in place (upsert); a failed save leaves the
/// previous row intact, which the sync decider relies on for its
/// at-least-once contract.
#[derive(Clone)]
pub struct PgIndexerCursorStore {
    pool: PgPool,
    table: String,
}

impl PgIndexerCursorStore {
    /// Create a cursor store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: CURSOR_TABLE.to_string(),
        }
    }

    /// Use a different state table.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

impl IndexerCursorStore for PgIndexerCursorStore {
    fn load(
        &self,
        view_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<IndexerState, IndexerError>> + Send + '_>> {
        let view_id = view_id.to_string();
        Box::pin(async move {
            let query = format!(
                "SELECT version_id, updated FROM {} WHERE view_id = $1",
                self.table
            );
            let row: Option<(i64, DateTime<Utc>)> = sqlx::query_as(&query)
                .bind(&view_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| IndexerError::Cursor(format!("Failed to load cursor: {e}")))?;

            Ok(match row {
                Some((version_id, updated_at)) => IndexerState {
                    view_id,
                    version_id: u64::try_from(version_id).unwrap_or(0),
                    updated_at,
                },
                None => IndexerState::new(view_id),
            })
        })
    }

    fn save(
        &self,
        state: &IndexerState,
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexerError>> + Send + '_>> {
        let state = state.clone();
        Box::pin(async move {
            // Versions fit BIGINT by construction (BIGSERIAL source).
            #[allow(clippy::cast_possible_wrap)]
            let version_id = state.version_id as i64;

            let query = format!(
                "INSERT INTO {} (view_id, version_id, updated) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (view_id) DO UPDATE \
                 SET version_id = EXCLUDED.version_id, updated = EXCLUDED.updated",
                self.table
            );
            sqlx::query(&query)
                .bind(&state.view_id)
                .bind(version_id)
                .bind(state.updated_at)
                .execute(&self.pool)
                .await
                .map_err(|e| IndexerError::Cursor(format!("Failed to save cursor: {e}")))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changelog_tables_follow_the_view_id() {
        assert_eq!(
            changelog_table_name("product_sync_stock_msi"),
            "product_sync_stock_msi_cl"
        );
    }
}
