//! Snapshot rows and DTOs.

use radar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A full row from `brief_snapshots`, including the frozen canvas document.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Snapshot {
    pub id: DbId,
    pub brief_id: DbId,
    pub created_by: DbId,
    pub reason: String,
    pub data: serde_json::Value,
    pub created_at: Timestamp,
}

/// Listing entry: everything except the canvas document.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SnapshotSummary {
    pub id: DbId,
    pub created_at: Timestamp,
    pub created_by: DbId,
    pub reason: String,
}

/// Request body for creating a snapshot.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSnapshotRequest {
    pub reason: Option<String>,
}
