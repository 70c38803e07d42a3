//! Repository for the `brief_blocks` table.

use radar_core::canvas::{BlockPatch, NewBlock};
use radar_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgExecutor;

use crate::models::canvas::Block;

/// Column list for brief_blocks queries.
const COLUMNS: &str = "id, brief_id, page_id, block_type, x, y, w, h, z, content, \
                       created_at, updated_at";

/// Provides block operations used by the canvas engine and state reader.
pub struct BlockRepo;

impl BlockRepo {
    /// Insert a block on `page_id`, returning the created row.
    ///
    /// The caller resolves `page_id`; `block.page_id` is ignored here.
    pub async fn create<'e, E>(
        executor: E,
        brief_id: DbId,
        page_id: DbId,
        block: &NewBlock,
    ) -> Result<Block, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO brief_blocks (brief_id, page_id, block_type, x, y, w, h, z, content) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(brief_id)
            .bind(page_id)
            .bind(&block.block_type)
            .bind(block.x)
            .bind(block.y)
            .bind(block.w)
            .bind(block.h)
            .bind(block.z)
            .bind(Json(&block.content))
            .fetch_one(executor)
            .await
    }

    /// Re-insert a block under its original id (snapshot restore).
    pub async fn insert_with_id<'e, E>(
        executor: E,
        brief_id: DbId,
        block: &Block,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO brief_blocks \
                (id, brief_id, page_id, block_type, x, y, w, h, z, content, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(block.id)
        .bind(brief_id)
        .bind(block.page_id)
        .bind(&block.block_type)
        .bind(block.x)
        .bind(block.y)
        .bind(block.w)
        .bind(block.h)
        .bind(block.z)
        .bind(Json(&block.content))
        .bind(block.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Apply a partial update. Returns `None` if the block is not in the brief.
    pub async fn update<'e, E>(
        executor: E,
        brief_id: DbId,
        id: DbId,
        patch: &BlockPatch,
    ) -> Result<Option<Block>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE brief_blocks SET \
                page_id = COALESCE($1, page_id), \
                block_type = COALESCE($2, block_type), \
                x = COALESCE($3, x), \
                y = COALESCE($4, y), \
                w = COALESCE($5, w), \
                h = COALESCE($6, h), \
                z = COALESCE($7, z), \
                content = COALESCE($8, content) \
             WHERE id = $9 AND brief_id = $10 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(patch.page_id)
            .bind(&patch.block_type)
            .bind(patch.x)
            .bind(patch.y)
            .bind(patch.w)
            .bind(patch.h)
            .bind(patch.z)
            .bind(patch.content.as_ref().map(Json))
            .bind(id)
            .bind(brief_id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a block. Returns `true` if a row was deleted.
    pub async fn delete<'e, E>(executor: E, brief_id: DbId, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM brief_blocks WHERE id = $1 AND brief_id = $2")
            .bind(id)
            .bind(brief_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All blocks of a brief grouped by page, each page's blocks by `z` then id.
    pub async fn list_by_brief<'e, E>(
        executor: E,
        brief_id: DbId,
    ) -> Result<Vec<Block>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM brief_blocks WHERE brief_id = $1 \
             ORDER BY page_id ASC, z ASC, id ASC"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(brief_id)
            .fetch_all(executor)
            .await
    }
}
