//! In-memory repositories - used when no database is configured.
//!
//! Both repositories share one set of tables so the user → movie cascade and
//! the owner foreign key behave like the PostgreSQL schema.
//! Note: Data is lost on process restart.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use reelvault_core::domain::{Movie, User, normalize_email};
use reelvault_core::error::RepoError;
use reelvault_core::ports::{BaseRepository, MovieRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    movies: HashMap<Uuid, Movie>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        let email = normalize_email(email);
        self.users
            .values()
            .any(|u| Some(u.id) != except && normalize_email(&u.email) == email)
    }
}

/// Shared handle to the in-memory tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn movies(&self) -> InMemoryMovieRepository {
        InMemoryMovieRepository {
            tables: Arc::clone(&self.tables),
        }
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

/// In-memory movie repository.
pub struct InMemoryMovieRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(&user.id) || tables.email_taken(&user.email, None) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if tables.email_taken(&user.email, Some(user.id)) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        let before = tables.movies.len();
        tables.movies.retain(|_, m| m.user_id != id);
        tracing::debug!(
            user_id = %id,
            movies_removed = before - tables.movies.len(),
            "User deleted"
        );

        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let email = normalize_email(email);
        let tables = self.tables.read().await;

        Ok(tables
            .users
            .values()
            .find(|u| normalize_email(&u.email) == email)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Movie, Uuid> for InMemoryMovieRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, RepoError> {
        Ok(self.tables.read().await.movies.get(&id).cloned())
    }

    async fn insert(&self, movie: Movie) -> Result<Movie, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&movie.user_id) {
            return Err(RepoError::Constraint(
                "Referenced entity does not exist".to_string(),
            ));
        }
        if tables.movies.contains_key(&movie.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tables.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn update(&self, movie: Movie) -> Result<Movie, RepoError> {
        let mut tables = self.tables.write().await;

        match tables.movies.get_mut(&movie.id) {
            Some(stored) => {
                *stored = movie.clone();
                Ok(movie)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        tables
            .movies
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Movie>, RepoError> {
        let tables = self.tables.read().await;

        Ok(tables
            .movies
            .get(&id)
            .filter(|m| m.user_id == owner)
            .cloned())
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Movie>, u64), RepoError> {
        let tables = self.tables.read().await;

        let mut owned: Vec<&Movie> = tables
            .movies
            .values()
            .filter(|m| m.user_id == owner)
            .collect();
        owned.sort_by_key(|m| (Reverse(m.created_at), Reverse(m.id)));

        let total = owned.len() as u64;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let page = owned
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        match tables.movies.get(&id) {
            Some(m) if m.user_id == owner => {
                tables.movies.remove(&id);
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelvault_core::domain::NewMovie;

    fn movie_for(owner: Uuid, title: &str) -> Movie {
        Movie::new(
            owner,
            NewMovie {
                title: title.to_string(),
                publishing_year: 2000,
                poster: None,
            },
        )
    }

    #[tokio::test]
    async fn test_email_unique_ignoring_case() {
        let store = MemoryStore::new();
        let users = store.users();

        users
            .insert(User::new("a@x.com", "h".to_string()))
            .await
            .unwrap();
        let dup = users.insert(User::new("A@X.COM", "h".to_string())).await;

        assert!(matches!(dup, Err(RepoError::Constraint(_))));
        assert!(users.find_by_email("A@x.Com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_movie_requires_existing_owner() {
        let store = MemoryStore::new();
        let result = store
            .movies()
            .insert(movie_for(Uuid::new_v4(), "Orphan"))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_movies() {
        let store = MemoryStore::new();
        let users = store.users();
        let movies = store.movies();

        let keep = users
            .insert(User::new("keep@x.com", "h".to_string()))
            .await
            .unwrap();
        let gone = users
            .insert(User::new("gone@x.com", "h".to_string()))
            .await
            .unwrap();

        movies.insert(movie_for(keep.id, "Kept")).await.unwrap();
        let doomed = movies.insert(movie_for(gone.id, "Doomed")).await.unwrap();

        users.delete(gone.id).await.unwrap();

        assert!(movies.find_by_id(doomed.id).await.unwrap().is_none());
        let (_, kept_total) = movies.list_owned(keep.id, 0, 10).await.unwrap();
        assert_eq!(kept_total, 1);
    }

    #[tokio::test]
    async fn test_list_orders_ties_by_id() {
        let store = MemoryStore::new();
        let owner = store
            .users()
            .insert(User::new("o@x.com", "h".to_string()))
            .await
            .unwrap();
        let movies = store.movies();

        let stamp = chrono::Utc::now();
        for title in ["A", "B", "C", "D"] {
            let mut movie = movie_for(owner.id, title);
            movie.created_at = stamp;
            movies.insert(movie).await.unwrap();
        }

        let (first, total) = movies.list_owned(owner.id, 0, 10).await.unwrap();
        let (second, _) = movies.list_owned(owner.id, 0, 10).await.unwrap();

        assert_eq!(total, 4);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn test_delete_owned_ignores_foreign_records() {
        let store = MemoryStore::new();
        let users = store.users();
        let a = users
            .insert(User::new("a@x.com", "h".to_string()))
            .await
            .unwrap();
        let b = users
            .insert(User::new("b@x.com", "h".to_string()))
            .await
            .unwrap();
        let movies = store.movies();
        let movie = movies.insert(movie_for(a.id, "Mine")).await.unwrap();

        assert!(matches!(
            movies.delete_owned(b.id, movie.id).await,
            Err(RepoError::NotFound)
        ));
        assert!(movies.find_owned(a.id, movie.id).await.unwrap().is_some());
    }
}
