//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use reelvault_core::domain::{Movie, User, normalize_email};
use reelvault_core::error::RepoError;
use reelvault_core::ports::{MovieRepository, UserRepository};

use super::entity::movie::{self, Entity as MovieEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::mask_email;
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL movie repository.
pub type PostgresMovieRepository = PostgresBaseRepository<MovieEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let lowered_email = Expr::expr(Func::lower(Expr::col(user::Column::Email)));

        let result = UserEntity::find()
            .filter(lowered_email.eq(normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Movie>, RepoError> {
        let result = MovieEntity::find_by_id(id)
            .filter(movie::Column::UserId.eq(owner))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Movie>, u64), RepoError> {
        let owned = MovieEntity::find().filter(movie::Column::UserId.eq(owner));

        let total = owned.clone().count(&self.db).await.map_err(repo_error)?;

        let rows = owned
            .order_by_desc(movie::Column::CreatedAt)
            .order_by_desc(movie::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<(), RepoError> {
        let result = MovieEntity::delete_many()
            .filter(movie::Column::Id.eq(id))
            .filter(movie::Column::UserId.eq(owner))
            .exec(&self.db)
            .await
            .map_err(repo_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
