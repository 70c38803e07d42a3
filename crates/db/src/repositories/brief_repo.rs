//! Repository for the `briefs` table.

use radar_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::brief::{Brief, CreateBrief, UpdateBrief};

/// Column list for briefs queries.
const COLUMNS: &str = "id, project_id, title, description, status, created_by, \
                       created_at, updated_at";

/// Provides CRUD operations and the publish transition for briefs.
pub struct BriefRepo;

impl BriefRepo {
    /// Insert a new draft brief, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBrief,
        created_by: DbId,
    ) -> Result<Brief, sqlx::Error> {
        let query = format!(
            "INSERT INTO briefs (project_id, title, description, created_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brief>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a brief by its primary key.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Brief>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM briefs WHERE id = $1");
        sqlx::query_as::<_, Brief>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a brief and row-lock it for the rest of the transaction.
    ///
    /// Serializes concurrent canvas writes against the same brief.
    pub async fn find_for_update<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Brief>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM briefs WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Brief>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List briefs of a project, most recently updated first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Brief>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM briefs WHERE project_id = $1 \
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Brief>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update title/description. Returns the updated row, or `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBrief,
    ) -> Result<Option<Brief>, sqlx::Error> {
        let query = format!(
            "UPDATE briefs SET \
                title = COALESCE($1, title), \
                description = COALESCE($2, description) \
             WHERE id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brief>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Flip a draft brief to `ready`.
    ///
    /// Returns `None` when the brief does not exist or is not a draft; the
    /// caller distinguishes the two.
    pub async fn publish(pool: &PgPool, id: DbId) -> Result<Option<Brief>, sqlx::Error> {
        let query = format!(
            "UPDATE briefs SET status = 'ready' \
             WHERE id = $1 AND status = 'draft' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brief>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Bump `updated_at` after a canvas change, returning the new value.
    pub async fn touch<'e, E>(executor: E, id: DbId) -> Result<Timestamp, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (Timestamp,) =
            sqlx::query_as("UPDATE briefs SET updated_at = NOW() WHERE id = $1 RETURNING updated_at")
                .bind(id)
                .fetch_one(executor)
                .await?;
        Ok(row.0)
    }
}
