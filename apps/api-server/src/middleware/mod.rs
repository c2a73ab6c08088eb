//! Middleware modules.

pub mod auth;
pub mod cors;
pub mod error;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;
