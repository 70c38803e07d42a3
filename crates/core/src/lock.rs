//! Brief lock tokens and TTL limits.
//!
//! A brief has at most one lock row. The plaintext token is handed to the
//! holder exactly once; only its SHA-256 digest is persisted, so the lock
//! table never contains a usable credential.

use rand::Rng;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default lock time-to-live in seconds. Each heartbeat renews it in full.
pub const DEFAULT_LOCK_TTL_SECS: i64 = 60;

/// Smallest accepted lock TTL in seconds.
pub const MIN_LOCK_TTL_SECS: i64 = 5;

/// Largest accepted lock TTL in seconds (1 hour).
pub const MAX_LOCK_TTL_SECS: i64 = 3_600;

/// How often the expired-lock sweep runs by default (in seconds).
pub const DEFAULT_LOCK_SWEEP_INTERVAL_SECS: u64 = 60;

/// Length of a generated lock token (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 48;

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A freshly generated lock token.
pub struct GeneratedLockToken {
    /// Returned to the holder, never stored.
    pub plaintext: String,
    /// SHA-256 hex digest of `plaintext`, stored in `brief_locks.token_hash`.
    pub hash: String,
}

/// Generate a new random lock token.
pub fn generate_lock_token() -> GeneratedLockToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_lock_token(&plaintext);
    GeneratedLockToken { plaintext, hash }
}

/// Digest a presented token for comparison against the stored hash.
pub fn hash_lock_token(token: &str) -> String {
    crate::hashing::sha256_hex(token.as_bytes())
}

// ---------------------------------------------------------------------------
// TTL
// ---------------------------------------------------------------------------

/// Validate a lock TTL in seconds. Returns `Ok(())` or an error message.
pub fn validate_lock_ttl(secs: i64) -> Result<(), String> {
    if secs < MIN_LOCK_TTL_SECS {
        return Err(format!(
            "Lock TTL must be at least {MIN_LOCK_TTL_SECS} seconds, got {secs}"
        ));
    }
    if secs > MAX_LOCK_TTL_SECS {
        return Err(format!(
            "Lock TTL must be at most {MAX_LOCK_TTL_SECS} seconds, got {secs}"
        ));
    }
    Ok(())
}
