//! Repository for the `brief_locks` table.
//!
//! One row per brief. Liveness is always evaluated against the database
//! clock (`NOW()`), so every server instance sees the same expiry.

use radar_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::lock::BriefLock;

/// Column list for `brief_locks` queries.
const LOCK_COLUMNS: &str = "id, brief_id, holder_id, token_hash, acquired_at, expires_at, \
                            created_at, updated_at";

/// Provides the single-writer lock protocol for briefs.
pub struct BriefLockRepo;

impl BriefLockRepo {
    /// Attempt to take the brief's lock for `holder_id` with a fresh token.
    ///
    /// Uses `INSERT ... ON CONFLICT (brief_id) DO UPDATE ... WHERE` so the
    /// existing row is only overwritten when it has expired or already belongs
    /// to the same holder. Returns `None` when a live lock of another holder
    /// is in the way.
    pub async fn acquire(
        pool: &PgPool,
        brief_id: DbId,
        holder_id: DbId,
        token_hash: &str,
        ttl_secs: i64,
    ) -> Result<Option<BriefLock>, sqlx::Error> {
        let query = format!(
            "INSERT INTO brief_locks (brief_id, holder_id, token_hash, acquired_at, expires_at) \
             VALUES ($1, $2, $3, NOW(), NOW() + make_interval(secs => $4)) \
             ON CONFLICT (brief_id) DO UPDATE SET \
                holder_id = EXCLUDED.holder_id, \
                token_hash = EXCLUDED.token_hash, \
                acquired_at = EXCLUDED.acquired_at, \
                expires_at = EXCLUDED.expires_at \
             WHERE brief_locks.expires_at <= NOW() \
                OR brief_locks.holder_id = EXCLUDED.holder_id \
             RETURNING {LOCK_COLUMNS}"
        );
        sqlx::query_as::<_, BriefLock>(&query)
            .bind(brief_id)
            .bind(holder_id)
            .bind(token_hash)
            .bind(ttl_secs as f64)
            .fetch_optional(pool)
            .await
    }

    /// Extend a live lock to `NOW() + ttl`. Only the matching token can extend.
    ///
    /// Returns the updated lock, or `None` if the token does not match or the
    /// lock has already expired.
    pub async fn heartbeat(
        pool: &PgPool,
        brief_id: DbId,
        token_hash: &str,
        ttl_secs: i64,
    ) -> Result<Option<BriefLock>, sqlx::Error> {
        let query = format!(
            "UPDATE brief_locks SET expires_at = NOW() + make_interval(secs => $3) \
             WHERE brief_id = $1 AND token_hash = $2 AND expires_at > NOW() \
             RETURNING {LOCK_COLUMNS}"
        );
        sqlx::query_as::<_, BriefLock>(&query)
            .bind(brief_id)
            .bind(token_hash)
            .bind(ttl_secs as f64)
            .fetch_optional(pool)
            .await
    }

    /// Drop the lock if `token_hash` matches. Never fails on a mismatch.
    ///
    /// Returns `true` if a lock row was removed.
    pub async fn release(
        pool: &PgPool,
        brief_id: DbId,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM brief_locks WHERE brief_id = $1 AND token_hash = $2")
                .bind(brief_id)
                .bind(token_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get the live lock for a brief, or `None` if unlocked or expired.
    pub async fn get_active<'e, E>(
        executor: E,
        brief_id: DbId,
    ) -> Result<Option<BriefLock>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {LOCK_COLUMNS} FROM brief_locks \
             WHERE brief_id = $1 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, BriefLock>(&query)
            .bind(brief_id)
            .fetch_optional(executor)
            .await
    }

    /// Find the live lock matching `token_hash` and row-lock it.
    ///
    /// Used inside write transactions so the lock cannot be taken over until
    /// the transaction finishes.
    pub async fn find_live_for_update<'e, E>(
        executor: E,
        brief_id: DbId,
        token_hash: &str,
    ) -> Result<Option<BriefLock>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {LOCK_COLUMNS} FROM brief_locks \
             WHERE brief_id = $1 AND token_hash = $2 AND expires_at > NOW() \
             FOR UPDATE"
        );
        sqlx::query_as::<_, BriefLock>(&query)
            .bind(brief_id)
            .bind(token_hash)
            .fetch_optional(executor)
            .await
    }

    /// Delete all expired lock rows. Returns the number removed.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM brief_locks WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
