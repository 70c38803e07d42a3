//! Request handlers.
//!
//! Each submodule groups the handlers of one resource. Handlers delegate to
//! the repositories in `radar_db` and map errors via [`crate::error::AppError`].

pub mod briefs;
pub mod canvas;
pub mod health;
pub mod locks;
pub mod projects;
pub mod snapshots;

use radar_core::error::CoreError;
use radar_core::types::DbId;
use radar_db::models::brief::Brief;
use radar_db::repositories::BriefRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Load a brief or fail with `NotFound`.
pub(crate) async fn require_brief(pool: &PgPool, id: DbId) -> AppResult<Brief> {
    BriefRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Brief",
            id,
        }))
}

/// Map `validator` failures onto the domain validation error.
pub(crate) fn validation_error(errors: validator::ValidationErrors) -> AppError {
    AppError::Core(CoreError::Validation(errors.to_string()))
}
