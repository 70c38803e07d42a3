//! Page and block rows, plus the per-op result entry returned by a batch.

use radar_core::canvas::OpResultKind;
use radar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `brief_pages` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Page {
    pub id: DbId,
    pub brief_id: DbId,
    pub title: String,
    pub index_no: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `brief_blocks` table.
///
/// Serialized with the client-facing `type` key for `block_type`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Block {
    pub id: DbId,
    pub brief_id: DbId,
    pub page_id: DbId,
    #[serde(rename = "type")]
    pub block_type: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub z: i32,
    pub content: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One entry of a successful batch response, in op order.
#[derive(Debug, Clone, Serialize)]
pub struct OpResult {
    #[serde(rename = "type")]
    pub kind: OpResultKind,
    pub data: serde_json::Value,
}

/// The full page/block graph of a brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasGraph {
    pub pages: Vec<Page>,
    pub blocks: Vec<Block>,
}

/// Request body of a canvas batch.
///
/// Ops stay raw JSON here so a malformed entry can be reported by index.
#[derive(Debug, Deserialize)]
pub struct CanvasPatchRequest {
    #[serde(rename = "lockToken")]
    pub lock_token: String,
    pub ops: Vec<serde_json::Value>,
}
