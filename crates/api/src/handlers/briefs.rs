//! Handlers for the `/briefs` resource and the publish transition.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use radar_core::brief::BriefStatus;
use radar_core::error::CoreError;
use radar_core::types::DbId;
use radar_db::models::brief::{Brief, CreateBrief, UpdateBrief};
use radar_db::repositories::{BriefRepo, ProjectRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{require_brief, validation_error};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BriefListQuery {
    pub project_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub success: bool,
    pub status: BriefStatus,
}

/// POST /api/briefs
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBrief>,
) -> AppResult<(StatusCode, Json<Brief>)> {
    input.validate().map_err(validation_error)?;

    ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;

    let brief = BriefRepo::create(&state.pool, &input, auth.user_id).await?;
    tracing::info!(
        brief_id = brief.id,
        project_id = brief.project_id,
        user_id = auth.user_id,
        "Brief created"
    );
    Ok((StatusCode::CREATED, Json(brief)))
}

/// GET /api/briefs?project_id=
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<BriefListQuery>,
) -> AppResult<Json<Vec<Brief>>> {
    let briefs = BriefRepo::list_by_project(&state.pool, query.project_id).await?;
    Ok(Json(briefs))
}

/// GET /api/briefs/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Brief>> {
    Ok(Json(require_brief(&state.pool, id).await?))
}

/// PATCH /api/briefs/{id}
///
/// Metadata only. Status changes go through publish.
pub async fn update(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBrief>,
) -> AppResult<Json<Brief>> {
    input.validate().map_err(validation_error)?;
    let brief = BriefRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Brief",
            id,
        }))?;
    Ok(Json(brief))
}

/// POST /api/briefs/{id}/publish
///
/// Flips a draft to `ready`. Publishing an already published brief is an
/// `InvalidState` error.
pub async fn publish(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PublishResponse>> {
    if let Some(brief) = BriefRepo::publish(&state.pool, id).await? {
        tracing::info!(brief_id = id, user_id = auth.user_id, "Brief published");
        return Ok(Json(PublishResponse {
            success: true,
            status: brief.status,
        }));
    }

    // Nothing updated: either the brief is missing or it is not a draft.
    let brief = require_brief(&state.pool, id).await?;
    brief.status.publish()?;
    Err(AppError::InternalError(format!(
        "Publish of brief {id} matched no draft row although the brief is a draft"
    )))
}
