//! Movie collection handlers. Every route runs behind `RequireAuth`.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use reelvault_core::domain::{Movie, MovieChanges, NewMovie};
use reelvault_core::pagination::PageRequest;
use reelvault_shared::MessageResponse;
use reelvault_shared::dto::{
    CreateMovieRequest, ListMoviesQuery, MovieListResponse, MovieResponse, UpdateMovieRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn movie_response(movie: Movie) -> MovieResponse {
    MovieResponse {
        id: movie.id,
        title: movie.title,
        publishing_year: movie.publishing_year,
        poster: movie.poster,
        user_id: movie.user_id,
        created_at: movie.created_at,
        updated_at: movie.updated_at,
    }
}

/// A malformed id cannot name any movie, so it is reported like a missing one.
fn movie_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Movie with id {raw} not found")))
}

/// POST /movies
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateMovieRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let attrs = NewMovie {
        title: req.title,
        publishing_year: req.publishing_year,
        poster: req.poster,
    };

    let movie = state.movies.create(identity.caller(), attrs).await?;
    Ok(HttpResponse::Created().json(movie_response(movie)))
}

/// GET /movies?page&limit
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListMoviesQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::new(query.page, query.limit)?;
    let page = state.movies.list(identity.caller(), request).await?;

    Ok(HttpResponse::Ok().json(MovieListResponse {
        total: page.total,
        page: page.page,
        limit: page.limit,
        data: page.items.into_iter().map(movie_response).collect(),
    }))
}

/// GET /movies/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = movie_id(&path)?;
    let movie = state.movies.get(identity.caller(), id).await?;
    Ok(HttpResponse::Ok().json(movie_response(movie)))
}

/// PATCH /movies/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdateMovieRequest>,
) -> AppResult<HttpResponse> {
    let id = movie_id(&path)?;
    let req = body.into_inner();
    let changes = MovieChanges {
        title: req.title,
        publishing_year: req.publishing_year,
        poster: req.poster,
    };

    let movie = state.movies.update(identity.caller(), id, changes).await?;
    Ok(HttpResponse::Ok().json(movie_response(movie)))
}

/// DELETE /movies/{id}
pub async fn remove(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = movie_id(&path)?;
    state.movies.remove(identity.caller(), id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Movie deleted successfully")))
}
