//! Brief models and DTOs.

use radar_core::brief::BriefStatus;
use radar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `briefs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brief {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: BriefStatus,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a brief. New briefs always start as `draft`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBrief {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

/// Input for updating brief metadata (all fields optional).
///
/// Status is deliberately absent: it only changes through publish.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBrief {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}
