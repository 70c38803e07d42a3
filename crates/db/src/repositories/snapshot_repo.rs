//! Repository for the append-only `brief_snapshots` table.

use radar_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::models::canvas::CanvasGraph;
use crate::models::snapshot::{Snapshot, SnapshotSummary};

/// Column list for full snapshot queries.
const COLUMNS: &str = "id, brief_id, created_by, reason, data, created_at";

/// Column list for listing queries (no canvas document).
const SUMMARY_COLUMNS: &str = "id, created_at, created_by, reason";

/// Provides insert and read access to snapshots. There is no update.
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Store a frozen copy of `graph`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        brief_id: DbId,
        created_by: DbId,
        reason: &str,
        graph: &CanvasGraph,
    ) -> Result<Snapshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO brief_snapshots (brief_id, created_by, reason, data) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Snapshot>(&query)
            .bind(brief_id)
            .bind(created_by)
            .bind(reason)
            .bind(Json(graph))
            .fetch_one(pool)
            .await
    }

    /// Find a snapshot of the given brief by id.
    pub async fn find_by_id<'e, E>(
        executor: E,
        brief_id: DbId,
        id: DbId,
    ) -> Result<Option<Snapshot>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM brief_snapshots WHERE id = $1 AND brief_id = $2"
        );
        sqlx::query_as::<_, Snapshot>(&query)
            .bind(id)
            .bind(brief_id)
            .fetch_optional(executor)
            .await
    }

    /// One page of a brief's snapshots, newest first.
    pub async fn list_by_brief(
        pool: &PgPool,
        brief_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SnapshotSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM brief_snapshots WHERE brief_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SnapshotSummary>(&query)
            .bind(brief_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all snapshots of a brief.
    pub async fn count_by_brief(pool: &PgPool, brief_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM brief_snapshots WHERE brief_id = $1")
                .bind(brief_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
