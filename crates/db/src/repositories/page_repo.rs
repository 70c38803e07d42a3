//! Repository for the `brief_pages` table.
//!
//! Every method is scoped by `brief_id`, so an id belonging to another brief
//! behaves exactly like an unknown id.

use radar_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::canvas::Page;

/// Column list for brief_pages queries.
const COLUMNS: &str = "id, brief_id, title, index_no, created_at, updated_at";

/// Provides page operations used by the canvas engine and state reader.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        brief_id: DbId,
        title: &str,
        index_no: i32,
    ) -> Result<Page, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO brief_pages (brief_id, title, index_no) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(brief_id)
            .bind(title)
            .bind(index_no)
            .fetch_one(executor)
            .await
    }

    /// Re-insert a page under its original id (snapshot restore).
    pub async fn insert_with_id<'e, E>(
        executor: E,
        brief_id: DbId,
        page: &Page,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO brief_pages (id, brief_id, title, index_no, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(page.id)
        .bind(brief_id)
        .bind(&page.title)
        .bind(page.index_no)
        .bind(page.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Update title and/or position. Returns `None` if the page is not in the brief.
    pub async fn update<'e, E>(
        executor: E,
        brief_id: DbId,
        id: DbId,
        title: Option<&str>,
        index_no: Option<i32>,
    ) -> Result<Option<Page>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE brief_pages SET \
                title = COALESCE($1, title), \
                index_no = COALESCE($2, index_no) \
             WHERE id = $3 AND brief_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(title)
            .bind(index_no)
            .bind(id)
            .bind(brief_id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a page (its blocks cascade). Returns `true` if a row was deleted.
    pub async fn delete<'e, E>(executor: E, brief_id: DbId, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM brief_pages WHERE id = $1 AND brief_id = $2")
            .bind(id)
            .bind(brief_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every page of a brief (blocks cascade). Returns the number deleted.
    pub async fn delete_all<'e, E>(executor: E, brief_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM brief_pages WHERE brief_id = $1")
            .bind(brief_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Returns `true` if the page exists and belongs to the brief.
    pub async fn exists<'e, E>(executor: E, brief_id: DbId, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM brief_pages WHERE id = $1 AND brief_id = $2)",
        )
        .bind(id)
        .bind(brief_id)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// Id of the brief's first page by display order, if any.
    pub async fn first_page_id<'e, E>(
        executor: E,
        brief_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM brief_pages WHERE brief_id = $1 \
             ORDER BY index_no ASC, id ASC LIMIT 1",
        )
        .bind(brief_id)
        .fetch_optional(executor)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// All pages of a brief ordered by `index_no`, ties broken by id.
    pub async fn list_by_brief<'e, E>(executor: E, brief_id: DbId) -> Result<Vec<Page>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM brief_pages WHERE brief_id = $1 \
             ORDER BY index_no ASC, id ASC"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(brief_id)
            .fetch_all(executor)
            .await
    }
}
