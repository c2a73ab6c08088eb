//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod rate_limit;
mod repository;
mod upload;

pub use auth::{AuthError, IssuedToken, PasswordService, TokenService, TokenSubject};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{BaseRepository, MovieRepository, UserRepository};
pub use upload::{ImageUploader, UploadError};
