//! Poster image hosting.

mod cloudinary;

pub use cloudinary::{CloudinaryConfig, CloudinaryUploader};
