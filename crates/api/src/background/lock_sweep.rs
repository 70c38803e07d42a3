//! Periodic removal of expired brief locks.
//!
//! Expiry is already enforced at read time (`expires_at > NOW()`), so this job
//! only keeps `brief_locks` from accumulating dead rows.

use std::time::Duration;

use radar_db::repositories::BriefLockRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the sweep loop every `interval` until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Lock sweep job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Lock sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                match BriefLockRepo::cleanup_expired(&pool).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Lock sweep: removed expired locks");
                        } else {
                            tracing::debug!("Lock sweep: nothing to remove");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Lock sweep: cleanup failed");
                    }
                }
            }
        }
    }
}
