use uuid::Uuid;

use super::User;
use crate::ports::TokenSubject;

/// Result of a successful credential check.
///
/// Lives only between verification and token issuance. It never carries
/// the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub user_id: Uuid,
    pub email: String,
    pub is_active: bool,
}

impl From<&User> for IdentityClaim {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            is_active: user.is_active,
        }
    }
}

/// The authenticated caller of a single request.
///
/// Built from a validated token subject and passed explicitly to every
/// ownership-scoped operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    user_id: Uuid,
}

impl Caller {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl From<TokenSubject> for Caller {
    fn from(subject: TokenSubject) -> Self {
        Self {
            user_id: subject.user_id,
        }
    }
}
