//! Authentication ports.

use uuid::Uuid;

use crate::domain::IdentityClaim;

/// What a valid token says about its bearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// A freshly minted bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds, for `expires_in` style responses.
    pub expires_in: i64,
}

/// Stateless bearer-token issuing and validation.
pub trait TokenService: Send + Sync {
    /// Mint a signed token for a verified identity.
    fn issue(&self, claim: &IdentityClaim) -> Result<IssuedToken, AuthError>;

    /// Check signature, issuer and expiry, returning the subject.
    ///
    /// Storage is not consulted: a user deactivated after issuance keeps a
    /// working token until it expires. Keep the TTL short enough that this
    /// window is acceptable.
    fn validate(&self, token: &str) -> Result<TokenSubject, AuthError>;

    /// Configured token lifetime in seconds.
    fn ttl_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}
