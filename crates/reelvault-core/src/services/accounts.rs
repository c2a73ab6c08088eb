//! Account provisioning.

use std::sync::Arc;

use chrono::{Datelike, Utc};

use crate::domain::{NewAccount, User, normalize_email};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};
use crate::validation::{REGISTRATION_RULES, validate};

/// Creates users with hashed passwords.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Register a new active user. Fails with `Duplicate` when the email is
    /// taken, compared case-insensitively.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, DomainError> {
        validate(
            REGISTRATION_RULES,
            &NewAccount { email, password },
            Utc::now().year(),
        )?;

        let email = normalize_email(email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(password)?;

        // A concurrent registration can still win the race; the unique
        // constraint catches it.
        let user = self
            .users
            .insert(User::new(&email, password_hash))
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => {
                    DomainError::Duplicate("Email already registered".to_string())
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::ports::{AuthError, BaseRepository};

    #[derive(Default)]
    struct Users(Mutex<HashMap<Uuid, User>>);

    #[async_trait]
    impl BaseRepository<User, Uuid> for Users {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
            Ok(self.0.lock().unwrap().get(&id).cloned())
        }

        async fn insert(&self, user: User) -> Result<User, RepoError> {
            self.0.lock().unwrap().insert(user.id, user.clone());
            Ok(user)
        }

        async fn update(&self, user: User) -> Result<User, RepoError> {
            self.insert(user).await
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
            self.0.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for Users {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            let email = normalize_email(email);
            Ok(self
                .0
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }
    }

    struct PlainPasswords;

    impl PasswordService for PlainPasswords {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("plain:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            Ok(hash == format!("plain:{password}"))
        }
    }

    fn service() -> AccountService {
        AccountService::new(Arc::new(Users::default()), Arc::new(PlainPasswords))
    }

    #[tokio::test]
    async fn test_register_hashes_and_normalizes() {
        let accounts = service();
        let user = accounts.register("Alice@X.com", "password1").await.unwrap();

        assert_eq!(user.email, "alice@x.com");
        assert_eq!(user.password_hash, "plain:password1");
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_ignoring_case() {
        let accounts = service();
        accounts.register("a@x.com", "password1").await.unwrap();

        let err = accounts.register("A@X.COM", "password2").await.unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let err = service().register("not-an-email", "short").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.len() == 2));
    }
}
