//! Movie entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    pub title: String,
    pub publishing_year: i32,
    #[sea_orm(nullable)]
    pub poster: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Owner relation. The cascade lives in the `movies.user_id` foreign key
/// created by the migration, so deleting a user drops their movies in the
/// same statement.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Movie.
impl From<Model> for reelvault_core::domain::Movie {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            publishing_year: model.publishing_year,
            poster: model.poster,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Movie to SeaORM ActiveModel.
impl From<reelvault_core::domain::Movie> for ActiveModel {
    fn from(movie: reelvault_core::domain::Movie) -> Self {
        Self {
            id: Set(movie.id),
            user_id: Set(movie.user_id),
            title: Set(movie.title),
            publishing_year: Set(movie.publishing_year),
            poster: Set(movie.poster),
            created_at: Set(movie.created_at.into()),
            updated_at: Set(movie.updated_at.into()),
        }
    }
}
