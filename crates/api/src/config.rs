use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;
use careoffice_core::cache::DEFAULT_TTL;
use careoffice_core::files::DEFAULT_MAX_UPLOAD_BYTES;

use crate::auth::jwt::JwtConfig;

/// A missing or malformed environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Read `key`, falling back to `default` when unset.
pub(crate) fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

/// Read a required, non-empty `key`.
pub(crate) fn env_required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Credentials for the admin account created at startup when no user with
/// that name exists yet.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Root directory for uploaded document files.
    pub upload_dir: PathBuf,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
    /// Lifetime of the cached metadata catalog.
    pub metadata_cache_ttl_secs: u64,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `5000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `UPLOAD_DIR`              | `storage/uploads`          |
    /// | `MAX_UPLOAD_BYTES`        | `10485760`                 |
    /// | `METADATA_CACHE_TTL_SECS` | `300`                      |
    /// | `ADMIN_USERNAME`          | unset                      |
    /// | `ADMIN_PASSWORD`          | unset                      |
    /// | `ADMIN_EMAIL`             | `{ADMIN_USERNAME}@localhost` |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("HOST", "0.0.0.0".to_string())?;
        let port: u16 = env_or("PORT", 5000)?;

        let cors_origins =
            parse_origins(&env_or("CORS_ORIGINS", "http://localhost:5173".to_string())?)?;

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30)?;
        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", 30)?;

        let jwt = JwtConfig::from_env()?;

        let upload_dir = PathBuf::from(env_or("UPLOAD_DIR", "storage/uploads".to_string())?);
        let max_upload_bytes: usize = env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        let metadata_cache_ttl_secs: u64 =
            env_or("METADATA_CACHE_TTL_SECS", DEFAULT_TTL.as_secs())?;

        let bootstrap_admin = match (
            std::env::var("ADMIN_USERNAME").ok().filter(|v| !v.is_empty()),
            std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        ) {
            (Some(username), Some(password)) => {
                let email = std::env::var("ADMIN_EMAIL")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| format!("{username}@localhost"));
                Some(BootstrapAdmin {
                    username,
                    password,
                    email,
                })
            }
            _ => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            upload_dir,
            max_upload_bytes,
            metadata_cache_ttl_secs,
            bootstrap_admin,
        })
    }
}

/// Split a comma-separated origin list, rejecting values that cannot be
/// sent back in `Access-Control-Allow-Origin`.
pub fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: origin.to_string(),
            })
        })
        .collect()
}
