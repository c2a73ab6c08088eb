//! Domain entities - the core business objects.

mod identity;
mod movie;
mod user;

pub use identity::{Caller, IdentityClaim};
pub use movie::{
    MAX_POSTER_BYTES, Movie, MovieChanges, NewMovie, POSTER_CONTENT_TYPES, PosterImage,
};
pub use user::{NewAccount, User, normalize_email};
