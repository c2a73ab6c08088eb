//! Ownership-scoped movie operations.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::domain::{Caller, Movie, MovieChanges, NewMovie};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, PageRequest};
use crate::ports::MovieRepository;
use crate::validation::{MOVIE_RULES, validate};

/// CRUD over movies where the caller only ever sees their own records.
pub struct MovieService {
    movies: Arc<dyn MovieRepository>,
}

impl MovieService {
    pub fn new(movies: Arc<dyn MovieRepository>) -> Self {
        Self { movies }
    }

    pub async fn create(&self, caller: &Caller, attrs: NewMovie) -> Result<Movie, DomainError> {
        validate(MOVIE_RULES, &attrs, current_year())?;

        let movie = Movie::new(caller.user_id(), attrs);
        let saved = self.movies.insert(movie).await?;

        tracing::info!(movie_id = %saved.id, user_id = %saved.user_id, "Movie created");
        Ok(saved)
    }

    pub async fn list(
        &self,
        caller: &Caller,
        request: PageRequest,
    ) -> Result<Page<Movie>, DomainError> {
        let (items, total) = self
            .movies
            .list_owned(caller.user_id(), request.offset(), request.limit())
            .await?;

        Ok(Page::new(items, total, request))
    }

    /// Missing and foreign-owned movies both fail with the same `NotFound`.
    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<Movie, DomainError> {
        self.movies
            .find_owned(caller.user_id(), id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Movie",
                id,
            })
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        changes: MovieChanges,
    ) -> Result<Movie, DomainError> {
        validate(MOVIE_RULES, &changes, current_year())?;

        let mut movie = self.get(caller, id).await?;
        movie.apply(changes);

        let saved = self
            .movies
            .update(movie)
            .await
            .map_err(|e| not_found_on_missing(e, id))?;

        tracing::info!(movie_id = %saved.id, "Movie updated");
        Ok(saved)
    }

    pub async fn remove(&self, caller: &Caller, id: Uuid) -> Result<(), DomainError> {
        let movie = self.get(caller, id).await?;

        self.movies
            .delete_owned(caller.user_id(), movie.id)
            .await
            .map_err(|e| not_found_on_missing(e, id))?;

        tracing::info!(movie_id = %id, "Movie deleted");
        Ok(())
    }
}

fn current_year() -> i32 {
    Utc::now().year()
}

/// A record that vanished between lookup and write reads as `NotFound`.
fn not_found_on_missing(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::NotFound {
            entity_type: "Movie",
            id,
        },
        other => other.into(),
    }
}
