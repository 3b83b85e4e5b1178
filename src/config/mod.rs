//! Application configuration loaded from environment.

use std::net::SocketAddr;

const DEFAULT_JWT_SECRET: &str = "authsvc_jwt_secret_change_in_production_32chars";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://localhost:5173";
const MIN_JWT_SECRET_LEN: usize = 32;
/// Ten years.
const MAX_JWT_EXPIRY_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:8081`).
    pub server_addr: SocketAddr,
    /// PostgreSQL connection URL. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    /// HS256 signing secret (min 32 bytes).
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiry_secs: i64,
    /// Origins allowed by the CORS layer.
    pub cors_allowed_origins: Vec<String>,
    /// Optional bootstrap administrator, created at startup if missing.
    pub admin: Option<AdminSeed>,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr: SocketAddr = lookup("SERVER_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8081".to_string())
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigLoadError::WeakJwtSecret(MIN_JWT_SECRET_LEN));
        }

        let jwt_expiry_secs = match lookup("JWT_EXPIRY_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| (1..=MAX_JWT_EXPIRY_SECS).contains(secs))
                .ok_or(ConfigLoadError::InvalidJwtExpiry(raw))?,
            None => 86_400,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            _ => return Err(ConfigLoadError::IncompleteAdminSeed),
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            server_addr,
            database_url,
            jwt_secret,
            jwt_expiry_secs,
            cors_allowed_origins,
            admin,
            log_level,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,

    #[error("JWT_SECRET must be at least {0} bytes")]
    WeakJwtSecret(usize),

    #[error("Invalid JWT_EXPIRY_SECS: {0}")]
    InvalidJwtExpiry(String),

    #[error("ADMIN_EMAIL and ADMIN_PASSWORD must be set together")]
    IncompleteAdminSeed,
}
