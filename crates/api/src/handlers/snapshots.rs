//! Handlers for brief snapshots: create, list, fetch, restore.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use radar_core::error::CoreError;
use radar_core::snapshot::{normalize_reason, PageWindow};
use radar_core::types::{DbId, Timestamp};
use radar_db::models::lock::LockTokenRequest;
use radar_db::models::snapshot::{CreateSnapshotRequest, Snapshot, SnapshotSummary};
use radar_db::repositories::{CanvasRepo, SnapshotRepo};
use serde::{Deserialize, Serialize};

use super::require_brief;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SnapshotListQuery {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotCreatedInfo {
    pub id: DbId,
    pub created_at: Timestamp,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct SnapshotCreated {
    pub success: bool,
    pub snapshot: SnapshotCreatedInfo,
}

#[derive(Debug, Serialize)]
pub struct SnapshotPage {
    pub snapshots: Vec<SnapshotSummary>,
    pub total: i64,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
}

#[derive(Debug, Serialize)]
pub struct SnapshotRestored {
    pub success: bool,
    pub updated_at: Timestamp,
}

/// POST /api/briefs/{id}/snapshots
///
/// No lock needed. The body may be empty.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<SnapshotCreated>> {
    let input: CreateSnapshotRequest = if body.is_empty() {
        CreateSnapshotRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid snapshot request: {e}")))?
    };
    let reason = normalize_reason(input.reason.as_deref())?;

    require_brief(&state.pool, brief_id).await?;
    let graph = CanvasRepo::read_graph(&state.pool, brief_id).await?;
    let snapshot =
        SnapshotRepo::create(&state.pool, brief_id, auth.user_id, &reason, &graph).await?;

    tracing::info!(
        brief_id,
        snapshot_id = snapshot.id,
        user_id = auth.user_id,
        pages = graph.pages.len(),
        blocks = graph.blocks.len(),
        "Snapshot created"
    );
    Ok(Json(SnapshotCreated {
        success: true,
        snapshot: SnapshotCreatedInfo {
            id: snapshot.id,
            created_at: snapshot.created_at,
            reason: snapshot.reason,
        },
    }))
}

/// GET /api/briefs/{id}/snapshots?page=&pageSize=
///
/// Newest first, without the canvas documents.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
    Query(query): Query<SnapshotListQuery>,
) -> AppResult<Json<SnapshotPage>> {
    require_brief(&state.pool, brief_id).await?;

    let window = PageWindow::new(query.page, query.page_size);
    let snapshots =
        SnapshotRepo::list_by_brief(&state.pool, brief_id, window.limit(), window.offset())
            .await?;
    let total = SnapshotRepo::count_by_brief(&state.pool, brief_id).await?;

    Ok(Json(SnapshotPage {
        snapshots,
        total,
        page: window.page,
        page_size: window.page_size,
    }))
}

/// GET /api/briefs/{id}/snapshots/{sid}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((brief_id, snapshot_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Snapshot>> {
    let snapshot = SnapshotRepo::find_by_id(&state.pool, brief_id, snapshot_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Snapshot",
            id: snapshot_id,
        }))?;
    Ok(Json(snapshot))
}

/// POST /api/briefs/{id}/snapshots/{sid}/restore
///
/// Replace the canvas with the snapshot's pages and blocks. Requires the lock.
pub async fn restore(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((brief_id, snapshot_id)): Path<(DbId, DbId)>,
    Json(input): Json<LockTokenRequest>,
) -> AppResult<Json<SnapshotRestored>> {
    let updated_at =
        CanvasRepo::restore_snapshot(&state.pool, brief_id, snapshot_id, &input.lock_token)
            .await?;

    tracing::info!(brief_id, snapshot_id, user_id = auth.user_id, "Snapshot restored");
    Ok(Json(SnapshotRestored {
        success: true,
        updated_at,
    }))
}
