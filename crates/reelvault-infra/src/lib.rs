//! # ReelVault Infrastructure
//!
//! Concrete implementations of the ports defined in `reelvault-core`.
//! This crate contains database, token, hashing, and image hosting integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - Rate limiting via governor
//! - `upload` - Cloudinary poster uploads via reqwest

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

#[cfg(feature = "upload")]
pub mod upload;

// Re-exports - In-Memory
pub use database::MemoryStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "upload")]
pub use upload::{CloudinaryConfig, CloudinaryUploader};
