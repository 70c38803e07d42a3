//! Brief lock rows and the client-facing lock views.

use radar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `brief_locks` table.
///
/// Never serialized directly: `token_hash` stays server-side.
#[derive(Debug, Clone, FromRow)]
pub struct BriefLock {
    pub id: DbId,
    pub brief_id: DbId,
    pub holder_id: DbId,
    pub token_hash: String,
    pub acquired_at: Timestamp,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Who holds a brief's lock and until when. Safe to show to any reader.
#[derive(Debug, Clone, Serialize)]
pub struct LockInfo {
    pub holder_id: DbId,
    pub acquired_at: Timestamp,
    pub expires_at: Timestamp,
}

impl From<BriefLock> for LockInfo {
    fn from(lock: BriefLock) -> Self {
        Self {
            holder_id: lock.holder_id,
            acquired_at: lock.acquired_at,
            expires_at: lock.expires_at,
        }
    }
}

/// Request body carrying a lock token (heartbeat, release, restore).
#[derive(Debug, Deserialize)]
pub struct LockTokenRequest {
    #[serde(rename = "lockToken")]
    pub lock_token: String,
}
