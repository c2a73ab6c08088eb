//! SeaORM entities.

pub mod movie;
pub mod user;
