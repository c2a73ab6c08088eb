//! Application configuration loaded from environment variables.

use std::env;

use reelvault_infra::JwtConfig;
use reelvault_infra::database::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use reelvault_infra::RateLimitConfig;

#[cfg(feature = "upload")]
use reelvault_infra::CloudinaryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    #[cfg(feature = "rate-limit")]
    pub login_rate_limit: RateLimitConfig,
    /// `TRUST_PROXY=true` keys the login limiter on forwarded client addresses.
    #[cfg(feature = "rate-limit")]
    pub trust_proxy: bool,
    pub cors: CorsConfig,
    /// `None` disables poster uploads.
    #[cfg(feature = "upload")]
    pub cloudinary: Option<CloudinaryConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            login_rate_limit: RateLimitConfig::from_env("LOGIN_RATE_LIMIT"),
            #[cfg(feature = "rate-limit")]
            trust_proxy: env::var("TRUST_PROXY").is_ok_and(|v| v == "true" || v == "1"),
            cors: CorsConfig::from_env(),
            #[cfg(feature = "upload")]
            cloudinary: CloudinaryConfig::from_env(),
        }
    }
}

/// Cross-origin policy for browser clients.
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Only this origin is allowed. `None` allows any origin.
    pub allowed_origin: Option<String>,
    /// Refuse cross-origin requests outright when no origin is configured.
    pub locked: bool,
}

impl CorsConfig {
    /// In production only `FRONTEND_URL` may call the API; elsewhere any origin may.
    pub fn from_env() -> Self {
        if is_production() {
            Self {
                allowed_origin: env::var("FRONTEND_URL").ok().filter(|url| !url.is_empty()),
                locked: true,
            }
        } else {
            Self::default()
        }
    }
}

/// `RUST_ENV=production` locks down CORS and makes an unreachable database
/// fatal at startup.
pub fn is_production() -> bool {
    env::var("RUST_ENV").is_ok_and(|v| v.eq_ignore_ascii_case("production"))
}
