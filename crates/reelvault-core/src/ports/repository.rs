use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Movie, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
///
/// Deleting a user removes every movie it owns.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Movie repository. Every lookup is keyed by owner as well as id.
#[async_trait]
pub trait MovieRepository: BaseRepository<Movie, Uuid> {
    /// Find a movie only if `owner` owns it.
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Movie>, RepoError>;

    /// One window of the owner's movies, newest first, plus the owner's total.
    ///
    /// Ordering is `created_at DESC, id DESC` so equal timestamps stay stable.
    async fn list_owned(
        &self,
        owner: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Movie>, u64), RepoError>;

    /// Delete a movie only if `owner` owns it.
    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<(), RepoError>;
}
