//! Handlers for reading and batch-editing a brief's canvas.

use axum::extract::{Path, State};
use axum::Json;
use radar_core::canvas::{decode_ops, plan_ops};
use radar_core::types::{DbId, Timestamp};
use radar_db::models::brief::Brief;
use radar_db::models::canvas::{Block, CanvasPatchRequest, OpResult, Page};
use radar_db::models::lock::LockInfo;
use radar_db::repositories::{BriefLockRepo, CanvasRepo};
use serde::Serialize;

use super::require_brief;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Client autosave hints. Advisory only.
#[derive(Debug, Serialize)]
pub struct AutosaveHints {
    #[serde(rename = "intervalMs")]
    pub interval_ms: u64,
    #[serde(rename = "maxBatch")]
    pub max_batch: usize,
}

#[derive(Debug, Serialize)]
pub struct CanvasState {
    pub brief: Brief,
    pub pages: Vec<Page>,
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock: Option<LockInfo>,
    pub autosave: AutosaveHints,
}

#[derive(Debug, Serialize)]
pub struct CanvasPatched {
    pub success: bool,
    pub results: Vec<OpResult>,
    pub updated_at: Timestamp,
}

/// GET /api/briefs/{id}/canvas
///
/// Full canvas state. Lock-free; `lock` is present only while one is live.
pub async fn get_state(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
) -> AppResult<Json<CanvasState>> {
    let brief = require_brief(&state.pool, brief_id).await?;
    let graph = CanvasRepo::read_graph(&state.pool, brief_id).await?;
    let lock = BriefLockRepo::get_active(&state.pool, brief_id).await?;

    let canvas = &state.config.canvas;
    Ok(Json(CanvasState {
        brief,
        pages: graph.pages,
        blocks: graph.blocks,
        lock: lock.map(LockInfo::from),
        autosave: AutosaveHints {
            interval_ms: canvas.autosave_interval_ms,
            max_batch: canvas.max_batch,
        },
    }))
}

/// PATCH /api/briefs/{id}/canvas
///
/// Validate the whole batch, then apply it atomically under the lock.
pub async fn apply_ops(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
    Json(input): Json<CanvasPatchRequest>,
) -> AppResult<Json<CanvasPatched>> {
    let op_count = input.ops.len();
    let ops = decode_ops(input.ops)?;
    let planned = plan_ops(ops, state.config.canvas.max_batch)?;

    let applied = CanvasRepo::apply_ops(&state.pool, brief_id, &input.lock_token, planned)
        .await
        .inspect_err(|e| {
            tracing::debug!(brief_id, user_id = auth.user_id, op_count, error = %e, "Canvas batch rejected");
        })?;

    tracing::info!(brief_id, user_id = auth.user_id, op_count, "Canvas batch applied");
    Ok(Json(CanvasPatched {
        success: true,
        results: applied.results,
        updated_at: applied.updated_at,
    }))
}
