use radar_core::canvas::{validate_max_batch, DEFAULT_AUTOSAVE_INTERVAL_MS, DEFAULT_MAX_BATCH};
use radar_core::lock::{
    validate_lock_ttl, DEFAULT_LOCK_SWEEP_INTERVAL_SECS, DEFAULT_LOCK_TTL_SECS,
};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background jobs after the server stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT validation settings.
    pub jwt: JwtConfig,
    /// Lock and autosave settings.
    pub canvas: CanvasConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    ///
    /// See [`JwtConfig::from_env`] and [`CanvasConfig::from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            canvas: CanvasConfig::from_env(),
        }
    }
}

/// Lock lifetime, sweep cadence, and the autosave hints sent to clients.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Lock time-to-live in seconds; each heartbeat renews it in full.
    pub lock_ttl_secs: i64,
    /// Interval of the expired-lock sweep in seconds.
    pub lock_sweep_interval_secs: u64,
    /// Suggested client autosave cadence in milliseconds. Advisory only.
    pub autosave_interval_ms: u64,
    /// Maximum number of ops accepted in one canvas batch.
    pub max_batch: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            lock_ttl_secs: DEFAULT_LOCK_TTL_SECS,
            lock_sweep_interval_secs: DEFAULT_LOCK_SWEEP_INTERVAL_SECS,
            autosave_interval_ms: DEFAULT_AUTOSAVE_INTERVAL_MS,
            max_batch: DEFAULT_MAX_BATCH,
        }
    }
}

impl CanvasConfig {
    /// Load canvas settings from environment variables.
    ///
    /// | Env Var                       | Default |
    /// |-------------------------------|---------|
    /// | `LOCK_TTL_SECS`               | `60`    |
    /// | `LOCK_SWEEP_INTERVAL_SECS`    | `60`    |
    /// | `CANVAS_AUTOSAVE_INTERVAL_MS` | `1500`  |
    /// | `CANVAS_MAX_BATCH`            | `50`    |
    ///
    /// # Panics
    ///
    /// Panics if a value does not parse or falls outside its accepted range.
    pub fn from_env() -> Self {
        let lock_ttl_secs: i64 = std::env::var("LOCK_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_LOCK_TTL_SECS.to_string())
            .parse()
            .expect("LOCK_TTL_SECS must be a valid i64");
        if let Err(msg) = validate_lock_ttl(lock_ttl_secs) {
            panic!("LOCK_TTL_SECS: {msg}");
        }

        let lock_sweep_interval_secs: u64 = std::env::var("LOCK_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_LOCK_SWEEP_INTERVAL_SECS.to_string())
            .parse()
            .expect("LOCK_SWEEP_INTERVAL_SECS must be a valid u64");
        assert!(
            lock_sweep_interval_secs > 0,
            "LOCK_SWEEP_INTERVAL_SECS must be greater than zero"
        );

        let autosave_interval_ms: u64 = std::env::var("CANVAS_AUTOSAVE_INTERVAL_MS")
            .unwrap_or_else(|_| DEFAULT_AUTOSAVE_INTERVAL_MS.to_string())
            .parse()
            .expect("CANVAS_AUTOSAVE_INTERVAL_MS must be a valid u64");

        let max_batch: usize = std::env::var("CANVAS_MAX_BATCH")
            .unwrap_or_else(|_| DEFAULT_MAX_BATCH.to_string())
            .parse()
            .expect("CANVAS_MAX_BATCH must be a valid usize");
        if let Err(msg) = validate_max_batch(max_batch) {
            panic!("CANVAS_MAX_BATCH: {msg}");
        }

        Self {
            lock_ttl_secs,
            lock_sweep_interval_secs,
            autosave_interval_ms,
            max_batch,
        }
    }
}
