use std::str::FromStr;
use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable fmt layer (default).
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
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
    /// Upper bound on draining in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// How long a workflow transaction waits for a sample row lock.
    pub workflow_lock_timeout_ms: u64,
    pub log_format: LogFormat,
    /// Maximum pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `WORKFLOW_LOCK_TIMEOUT_MS` | `5000`                     |
    /// | `LOG_FORMAT`               | `text`                     |
    /// | `DB_MAX_CONNECTIONS`       | `20`                       |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values, on a lock timeout outside
    /// `1..=i32::MAX`, and when `JWT_SECRET` is missing, so a misconfigured
    /// server never starts.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000);

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);
        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", 30);
        let workflow_lock_timeout_ms =
            check_lock_timeout(env_or("WORKFLOW_LOCK_TIMEOUT_MS", 5000))
                .unwrap_or_else(|e| panic!("{e}"));
        let log_format: LogFormat = env_or("LOG_FORMAT", LogFormat::Text);
        let db_max_connections: u32 =
            env_or("DB_MAX_CONNECTIONS", labelflow_db::DEFAULT_MAX_CONNECTIONS);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            workflow_lock_timeout_ms,
            log_format,
            db_max_connections,
            jwt,
        }
    }

    pub fn workflow_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.workflow_lock_timeout_ms)
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw).unwrap_or_else(|e| panic!("{e}")),
        Err(_) => default,
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| format!("{key} has invalid value '{raw}': {e}"))
}

/// Postgres takes `lock_timeout` as a positive `int` of milliseconds; `0`
/// would disable it.
fn check_lock_timeout(ms: u64) -> Result<u64, String> {
    if ms == 0 || ms > i32::MAX as u64 {
        return Err(format!(
            "WORKFLOW_LOCK_TIMEOUT_MS must be between 1 and {}, got {ms}",
            i32::MAX
        ));
    }
    Ok(ms)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
