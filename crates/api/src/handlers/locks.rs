//! Handlers for the single-writer lock on a brief's canvas.
//!
//! The lock token is returned once, on acquire. Heartbeat, release, and every
//! canvas write must present it; the server only keeps its hash.

use axum::extract::{Path, State};
use axum::Json;
use radar_core::error::CoreError;
use radar_core::lock::{generate_lock_token, hash_lock_token};
use radar_core::types::{DbId, Timestamp};
use radar_db::models::lock::{LockInfo, LockTokenRequest};
use radar_db::repositories::BriefLockRepo;
use serde::Serialize;

use super::require_brief;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LockAcquired {
    #[serde(rename = "lockToken")]
    pub lock_token: String,
    pub expires_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct LockRenewed {
    pub expires_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct LockReleased {
    pub released: bool,
}

#[derive(Debug, Serialize)]
pub struct LockStatus {
    pub lock: Option<LockInfo>,
}

/// POST /api/briefs/{id}/lock
///
/// Take the brief's lock for the caller. Returns 409 while another holder's
/// lock is live; a re-acquire by the same holder rotates the token.
pub async fn acquire(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
) -> AppResult<Json<LockAcquired>> {
    require_brief(&state.pool, brief_id).await?;

    let token = generate_lock_token();
    let ttl_secs = state.config.canvas.lock_ttl_secs;
    let acquired =
        BriefLockRepo::acquire(&state.pool, brief_id, auth.user_id, &token.hash, ttl_secs)
            .await?;

    match acquired {
        Some(lock) => {
            tracing::info!(
                brief_id,
                user_id = auth.user_id,
                expires_at = %lock.expires_at,
                "Brief lock acquired"
            );
            Ok(Json(LockAcquired {
                lock_token: token.plaintext,
                expires_at: lock.expires_at,
            }))
        }
        None => {
            // Refused: look up the live holder for the error message.
            let holder = BriefLockRepo::get_active(&state.pool, brief_id).await?;
            match holder {
                Some(h) => {
                    tracing::debug!(
                        brief_id,
                        user_id = auth.user_id,
                        holder_id = h.holder_id,
                        "Brief lock refused"
                    );
                    Err(AppError::Core(CoreError::Conflict(format!(
                        "Brief is locked by user {} until {}",
                        h.holder_id, h.expires_at
                    ))))
                }
                // The holder's lock lapsed between the two statements.
                None => Err(AppError::Core(CoreError::Conflict(
                    "Brief lock changed hands, retry".into(),
                ))),
            }
        }
    }
}

/// POST /api/briefs/{id}/lock/heartbeat
///
/// Extend a live lock by a full TTL. Returns 423 if the token is stale.
pub async fn heartbeat(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
    Json(input): Json<LockTokenRequest>,
) -> AppResult<Json<LockRenewed>> {
    let token_hash = hash_lock_token(&input.lock_token);
    let lock = BriefLockRepo::heartbeat(
        &state.pool,
        brief_id,
        &token_hash,
        state.config.canvas.lock_ttl_secs,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::InvalidLock(
            "Lock token is not valid or the lock has expired".into(),
        ))
    })?;

    tracing::debug!(
        brief_id,
        user_id = auth.user_id,
        expires_at = %lock.expires_at,
        "Brief lock extended"
    );
    Ok(Json(LockRenewed {
        expires_at: lock.expires_at,
    }))
}

/// DELETE /api/briefs/{id}/lock
///
/// Idempotent: answers `released: true` whether or not a row was removed.
pub async fn release(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
    Json(input): Json<LockTokenRequest>,
) -> AppResult<Json<LockReleased>> {
    let token_hash = hash_lock_token(&input.lock_token);
    let removed = BriefLockRepo::release(&state.pool, brief_id, &token_hash).await?;
    tracing::info!(brief_id, user_id = auth.user_id, removed, "Brief lock released");
    Ok(Json(LockReleased { released: true }))
}

/// GET /api/briefs/{id}/lock
///
/// Current live lock, if any. Never exposes the token.
pub async fn status(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
) -> AppResult<Json<LockStatus>> {
    require_brief(&state.pool, brief_id).await?;
    let lock = BriefLockRepo::get_active(&state.pool, brief_id).await?;
    Ok(Json(LockStatus {
        lock: lock.map(LockInfo::from),
    }))
}
