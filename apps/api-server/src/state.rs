//! Application state - shared across all handlers.

use std::sync::Arc;

use reelvault_core::ports::{
    AuthError, ImageUploader, MovieRepository, PasswordService, TokenService, UserRepository,
};
use reelvault_core::services::{AccountService, CredentialVerifier, MovieService};
use reelvault_infra::database::{DatabaseConfig, MemoryStore};
use reelvault_infra::{Argon2PasswordService, JwtTokenService};

#[cfg(feature = "postgres")]
use reelvault_infra::database::{PostgresMovieRepository, PostgresUserRepository, connect};

#[cfg(feature = "rate-limit")]
use reelvault_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use reelvault_infra::InMemoryRateLimiter;

#[cfg(feature = "upload")]
use reelvault_infra::{CloudinaryConfig, CloudinaryUploader};

use crate::config::AppConfig;

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Database unavailable: {0}")]
    Database(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn MovieRepository>);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub credentials: Arc<CredentialVerifier>,
    pub tokens: Arc<dyn TokenService>,
    pub movies: Arc<MovieService>,
    /// `None` when no image host is configured.
    pub uploader: Option<Arc<dyn ImageUploader>>,
    #[cfg(feature = "rate-limit")]
    pub login_limiter: Arc<dyn RateLimiter>,
    #[cfg(feature = "rate-limit")]
    pub trust_proxy: bool,
}

/// The pieces `AppState` is wired from.
pub struct Components {
    pub users: Arc<dyn UserRepository>,
    pub movies: Arc<dyn MovieRepository>,
    pub passwords: Arc<dyn PasswordService>,
    pub tokens: Arc<dyn TokenService>,
    pub uploader: Option<Arc<dyn ImageUploader>>,
    #[cfg(feature = "rate-limit")]
    pub login_limiter: Arc<dyn RateLimiter>,
    #[cfg(feature = "rate-limit")]
    pub trust_proxy: bool,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let (users, movies) = repositories(config.database.as_ref()).await?;

        #[cfg(feature = "upload")]
        let uploader = uploader(config.cloudinary.as_ref());
        #[cfg(not(feature = "upload"))]
        let uploader = None;

        let state = Self::from_components(Components {
            users,
            movies,
            passwords: Arc::new(Argon2PasswordService::new()),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            uploader,
            #[cfg(feature = "rate-limit")]
            login_limiter: Arc::new(InMemoryRateLimiter::new(config.login_rate_limit.clone())),
            #[cfg(feature = "rate-limit")]
            trust_proxy: config.trust_proxy,
        })?;

        tracing::info!("Application state initialized");
        Ok(state)
    }

    pub fn from_components(parts: Components) -> Result<Self, AuthError> {
        let credentials = CredentialVerifier::new(parts.users.clone(), parts.passwords.clone())?;

        Ok(Self {
            accounts: Arc::new(AccountService::new(parts.users, parts.passwords)),
            credentials: Arc::new(credentials),
            tokens: parts.tokens,
            movies: Arc::new(MovieService::new(parts.movies)),
            uploader: parts.uploader,
            #[cfg(feature = "rate-limit")]
            login_limiter: parts.login_limiter,
            #[cfg(feature = "rate-limit")]
            trust_proxy: parts.trust_proxy,
        })
    }
}

fn in_memory() -> Repositories {
    let store = MemoryStore::new();
    (Arc::new(store.users()), Arc::new(store.movies()))
}

#[cfg(feature = "postgres")]
async fn repositories(config: Option<&DatabaseConfig>) -> Result<Repositories, StartupError> {
    let Some(config) = config else {
        tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
        return Ok(in_memory());
    };

    match connect(config).await {
        Ok(conn) => Ok((
            Arc::new(PostgresUserRepository::new(conn.clone())),
            Arc::new(PostgresMovieRepository::new(conn)),
        )),
        Err(e) if crate::config::is_production() => Err(StartupError::Database(e.to_string())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            Ok(in_memory())
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(config: Option<&DatabaseConfig>) -> Result<Repositories, StartupError> {
    if config.is_some() {
        tracing::warn!("Built without postgres support; ignoring DATABASE_URL.");
    }
    Ok(in_memory())
}

#[cfg(feature = "upload")]
fn uploader(config: Option<&CloudinaryConfig>) -> Option<Arc<dyn ImageUploader>> {
    let Some(config) = config else {
        tracing::warn!("Cloudinary not configured. Poster uploads are disabled.");
        return None;
    };

    match CloudinaryUploader::new(config.clone()) {
        Ok(uploader) => Some(Arc::new(uploader)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build image uploader");
            None
        }
    }
}
