//! Credential verification.

use std::sync::Arc;

use crate::domain::{IdentityClaim, normalize_email};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, UserRepository};

/// Hashed on construction and checked when the email is unknown, so every
/// rejection path pays for one password verification.
const PARITY_SECRET: &str = "reelvault-timing-parity";

/// Checks an email/password pair against stored users.
pub struct CredentialVerifier {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    parity_hash: String,
}

impl CredentialVerifier {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
    ) -> Result<Self, AuthError> {
        let parity_hash = passwords.hash(PARITY_SECRET)?;
        Ok(Self {
            users,
            passwords,
            parity_hash,
        })
    }

    /// Returns the caller's identity, or `None` for an unknown email, a wrong
    /// password, or an inactive account. The three cases are not
    /// distinguishable from the result.
    ///
    /// Errors are reserved for storage and hashing failures.
    pub async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<IdentityClaim>, DomainError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            self.passwords.verify(password, &self.parity_hash)?;
            return Ok(None);
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            self.passwords.verify(password, &self.parity_hash)?;
            tracing::debug!("Credential check failed");
            return Ok(None);
        };

        let password_ok = self.passwords.verify(password, &user.password_hash)?;
        if !password_ok || !user.is_active {
            tracing::debug!(user_id = %user.id, "Credential check failed");
            return Ok(None);
        }

        Ok(Some(IdentityClaim::from(&user)))
    }
}
