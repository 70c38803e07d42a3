//! Transactional canvas operations: batch apply, consistent reads, restore.
//!
//! Write paths follow one shape: open a transaction, row-lock the brief, check
//! the presented lock token against the live lock row, check the brief is
//! still editable, then mutate. Any failure drops the transaction, so a batch
//! is applied completely or not at all.

use radar_core::canvas::{OpResultKind, PlannedOp};
use radar_core::error::CoreError;
use radar_core::lock::hash_lock_token;
use radar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::models::canvas::{CanvasGraph, OpResult};
use crate::repositories::{BlockRepo, BriefLockRepo, BriefRepo, PageRepo, SnapshotRepo};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a canvas write.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// Rejected before any op ran (missing brief, bad token, frozen brief).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The op at `index` failed; the whole batch was rolled back.
    #[error("op #{index}: {source}")]
    Op { index: usize, source: CoreError },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Outcome of a committed batch.
#[derive(Debug)]
pub struct AppliedBatch {
    pub results: Vec<OpResult>,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// CanvasRepo
// ---------------------------------------------------------------------------

/// Entry point for multi-table canvas reads and writes.
pub struct CanvasRepo;

impl CanvasRepo {
    /// Read a brief's pages and blocks from a single consistent snapshot.
    pub async fn read_graph(pool: &PgPool, brief_id: DbId) -> Result<CanvasGraph, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let pages = PageRepo::list_by_brief(&mut *tx, brief_id).await?;
        let blocks = BlockRepo::list_by_brief(&mut *tx, brief_id).await?;
        tx.commit().await?;

        Ok(CanvasGraph { pages, blocks })
    }

    /// Apply a validated batch under the brief's lock, all-or-nothing.
    ///
    /// Checks, in order: the brief exists, `lock_token` matches the live lock,
    /// the brief is a draft. Ops then run in array order; the first failing op
    /// aborts the batch and is reported with its index.
    pub async fn apply_ops(
        pool: &PgPool,
        brief_id: DbId,
        lock_token: &str,
        ops: Vec<PlannedOp>,
    ) -> Result<AppliedBatch, CanvasError> {
        let mut tx = pool.begin().await?;
        begin_write(&mut tx, brief_id, lock_token).await?;

        let mut results = Vec::with_capacity(ops.len());
        for (index, op) in ops.into_iter().enumerate() {
            let result = apply_op(&mut tx, brief_id, op)
                .await
                .map_err(|err| match err {
                    CanvasError::Core(source) => CanvasError::Op { index, source },
                    other => other,
                })?;
            results.push(result);
        }

        let updated_at = BriefRepo::touch(&mut *tx, brief_id).await?;
        tx.commit().await?;

        Ok(AppliedBatch {
            results,
            updated_at,
        })
    }

    /// Replace the brief's pages and blocks with the contents of a snapshot.
    ///
    /// Rows are re-created under their original ids. The snapshot row itself
    /// is only read.
    pub async fn restore_snapshot(
        pool: &PgPool,
        brief_id: DbId,
        snapshot_id: DbId,
        lock_token: &str,
    ) -> Result<Timestamp, CanvasError> {
        let mut tx = pool.begin().await?;
        begin_write(&mut tx, brief_id, lock_token).await?;

        let snapshot = SnapshotRepo::find_by_id(&mut *tx, brief_id, snapshot_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Snapshot",
                id: snapshot_id,
            })?;
        let graph: CanvasGraph = serde_json::from_value(snapshot.data).map_err(|e| {
            CoreError::Internal(format!(
                "Snapshot {snapshot_id} holds a malformed canvas document: {e}"
            ))
        })?;

        // Blocks cascade with their pages.
        PageRepo::delete_all(&mut *tx, brief_id).await?;
        for page in &graph.pages {
            PageRepo::insert_with_id(&mut *tx, brief_id, page).await?;
        }
        for block in &graph.blocks {
            BlockRepo::insert_with_id(&mut *tx, brief_id, block).await?;
        }

        let updated_at = BriefRepo::touch(&mut *tx, brief_id).await?;
        tx.commit().await?;

        tracing::debug!(
            brief_id,
            snapshot_id,
            pages = graph.pages.len(),
            blocks = graph.blocks.len(),
            "Canvas restored from snapshot"
        );
        Ok(updated_at)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Preconditions shared by every canvas write, run inside its transaction.
async fn begin_write(
    conn: &mut PgConnection,
    brief_id: DbId,
    lock_token: &str,
) -> Result<(), CanvasError> {
    let brief = BriefRepo::find_for_update(&mut *conn, brief_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Brief",
            id: brief_id,
        })?;

    let token_hash = hash_lock_token(lock_token);
    BriefLockRepo::find_live_for_update(&mut *conn, brief_id, &token_hash)
        .await?
        .ok_or_else(|| {
            CoreError::InvalidLock("Lock token does not match an active lock on this brief".into())
        })?;

    brief.status.ensure_editable()?;
    Ok(())
}

/// Execute one planned op. Domain failures come back as `CanvasError::Core`.
async fn apply_op(
    conn: &mut PgConnection,
    brief_id: DbId,
    op: PlannedOp,
) -> Result<OpResult, CanvasError> {
    match op {
        PlannedOp::CreatePage { title, index_no } => {
            let page = PageRepo::create(&mut *conn, brief_id, &title, index_no).await?;
            op_result(OpResultKind::PageCreated, &page)
        }
        PlannedOp::UpdatePage {
            id,
            title,
            index_no,
        } => {
            let page = PageRepo::update(&mut *conn, brief_id, id, title.as_deref(), index_no)
                .await?
                .ok_or(CoreError::NotFound { entity: "Page", id })?;
            op_result(OpResultKind::PageUpdated, &page)
        }
        PlannedOp::DeletePage { id } => {
            if !PageRepo::delete(&mut *conn, brief_id, id).await? {
                return Err(CoreError::NotFound { entity: "Page", id }.into());
            }
            op_result(OpResultKind::PageDeleted, &serde_json::json!({ "id": id }))
        }
        PlannedOp::CreateBlock(block) => {
            let page_id = match block.page_id {
                Some(page_id) => {
                    ensure_page(conn, brief_id, page_id).await?;
                    page_id
                }
                None => PageRepo::first_page_id(&mut *conn, brief_id)
                    .await?
                    .ok_or_else(|| {
                        CoreError::Validation(
                            "Brief has no pages; create a page first or pass page_id".into(),
                        )
                    })?,
            };
            let created = BlockRepo::create(&mut *conn, brief_id, page_id, &block).await?;
            op_result(OpResultKind::BlockCreated, &created)
        }
        PlannedOp::UpdateBlock { id, patch } => {
            if let Some(page_id) = patch.page_id {
                ensure_page(conn, brief_id, page_id).await?;
            }
            let block = BlockRepo::update(&mut *conn, brief_id, id, &patch)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Block",
                    id,
                })?;
            op_result(OpResultKind::BlockUpdated, &block)
        }
        PlannedOp::DeleteBlock { id } => {
            if !BlockRepo::delete(&mut *conn, brief_id, id).await? {
                return Err(CoreError::NotFound {
                    entity: "Block",
                    id,
                }
                .into());
            }
            op_result(OpResultKind::BlockDeleted, &serde_json::json!({ "id": id }))
        }
        PlannedOp::ReorderPages { pages } => {
            for entry in &pages {
                PageRepo::update(&mut *conn, brief_id, entry.id, None, Some(entry.index_no))
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "Page",
                        id: entry.id,
                    })?;
            }
            op_result(OpResultKind::PagesReordered, &pages)
        }
    }
}

async fn ensure_page(
    conn: &mut PgConnection,
    brief_id: DbId,
    page_id: DbId,
) -> Result<(), CanvasError> {
    if PageRepo::exists(&mut *conn, brief_id, page_id).await? {
        Ok(())
    } else {
        Err(CoreError::NotFound {
            entity: "Page",
            id: page_id,
        }
        .into())
    }
}

fn op_result<T: Serialize>(kind: OpResultKind, data: &T) -> Result<OpResult, CanvasError> {
    let data = serde_json::to_value(data)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize op result: {e}")))?;
    Ok(OpResult { kind, data })
}
