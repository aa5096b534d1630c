//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::constants::{
    APP_ENV_PRODUCTION, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_ORDER_TIMEOUT_SECONDS, DEFAULT_PUBLIC_PATH, DEFAULT_REDIS_URL,
    DEFAULT_REFRESH_TOKEN_DAYS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SESSION_TTL_SECONDS, MIN_JWT_SECRET_LENGTH,
};

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Deployment environment, read from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case(APP_ENV_PRODUCTION) {
            AppEnv::Production
        } else {
            AppEnv::Development
        }
    }
}

/// Where session data is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDriver {
    Memory,
    Redis,
}

impl SessionDriver {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("redis") {
            SessionDriver::Redis
        } else {
            SessionDriver::Memory
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub app_env: AppEnv,
    pub database_url: String,
    pub redis_url: String,
    pub session_driver: SessionDriver,
    pub session_ttl_seconds: u64,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub refresh_token_days: i64,
    pub server_host: String,
    pub server_port: u16,
    pub public_path: PathBuf,
    pub order_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_env", &self.app_env)
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("session_driver", &self.session_driver)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("public_path", &self.public_path)
            .field("order_timeout", &self.order_timeout)
            .finish()
    }
}

impl Default for Config {
    /// Development defaults, no environment lookups.
    fn default() -> Self {
        Self {
            app_env: AppEnv::Development,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            session_driver: SessionDriver::Memory,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            refresh_token_days: DEFAULT_REFRESH_TOKEN_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            public_path: PathBuf::from(DEFAULT_PUBLIC_PATH),
            order_timeout: Duration::from_secs(DEFAULT_ORDER_TIMEOUT_SECONDS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set in a release build or is too short,
    /// or if ORDER_TIMEOUT_SECONDS is not a whole number of at least 1.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            app_env: AppEnv::parse(&env::var("APP_ENV").unwrap_or_default()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            session_driver: SessionDriver::parse(
                &env::var("SESSION_DRIVER").unwrap_or_default(),
            ),
            session_ttl_seconds: parse_var("SESSION_TTL_SECONDS")
                .unwrap_or(DEFAULT_SESSION_TTL_SECONDS),
            jwt_secret,
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS")
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            refresh_token_days: parse_var("REFRESH_TOKEN_DAYS")
                .unwrap_or(DEFAULT_REFRESH_TOKEN_DAYS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            public_path: env::var("PUBLIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_PUBLIC_PATH)),
            order_timeout: order_timeout(env::var("ORDER_TIMEOUT_SECONDS").ok().as_deref())
                .unwrap_or_else(|msg| panic!("{}", msg)),
        }
    }

    /// Whether the application runs in production mode.
    pub fn is_production(&self) -> bool {
        self.app_env == AppEnv::Production
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Replace the JWT secret (tests and embedding).
    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Order strategy deadline; unset means the default, zero is rejected.
fn order_timeout(raw: Option<&str>) -> Result<Duration, String> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(DEFAULT_ORDER_TIMEOUT_SECONDS));
    };

    match raw.trim().parse::<u64>() {
        Ok(seconds) if seconds >= 1 => Ok(Duration::from_secs(seconds)),
        _ => Err(format!(
            "ORDER_TIMEOUT_SECONDS must be a whole number of seconds, at least 1 (got {:?})",
            raw
        )),
    }
}
