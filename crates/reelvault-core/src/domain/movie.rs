use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::validation::{FieldSource, FieldValue};

/// Upper bound on an uploaded poster payload.
pub const MAX_POSTER_BYTES: usize = 5 * 1024 * 1024;

/// Image formats accepted for posters.
pub const POSTER_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Movie entity - one record in a user's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub publishing_year: i32,
    pub poster: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Create a new movie owned by `owner`.
    pub fn new(owner: Uuid, attrs: NewMovie) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title: attrs.title,
            publishing_year: attrs.publishing_year,
            poster: attrs.poster,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the provided fields. Ownership is not part of `MovieChanges`,
    /// so it cannot change here.
    pub fn apply(&mut self, changes: MovieChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(year) = changes.publishing_year {
            self.publishing_year = year;
        }
        if let Some(poster) = changes.poster {
            self.poster = poster;
        }
        self.updated_at = Utc::now();
    }
}

/// Attributes supplied when creating a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub publishing_year: i32,
    pub poster: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub publishing_year: Option<i32>,
    /// `Some(None)` clears the poster.
    pub poster: Option<Option<String>>,
}

impl FieldSource for NewMovie {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "title" => Some(FieldValue::Text(&self.title)),
            "publishingYear" => Some(FieldValue::Int(self.publishing_year)),
            "poster" => self.poster.as_deref().map(FieldValue::Text),
            _ => None,
        }
    }
}

impl FieldSource for MovieChanges {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "title" => self.title.as_deref().map(FieldValue::Text),
            "publishingYear" => self.publishing_year.map(FieldValue::Int),
            "poster" => self.poster.as_ref()?.as_deref().map(FieldValue::Text),
            _ => None,
        }
    }
}

/// A raw poster upload that passed the type and size checks.
#[derive(Debug, Clone)]
pub struct PosterImage {
    content_type: String,
    bytes: Vec<u8>,
}

impl PosterImage {
    pub fn new(content_type: &str, bytes: Vec<u8>) -> Result<Self, DomainError> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if !POSTER_CONTENT_TYPES.contains(&mime.as_str()) {
            return Err(DomainError::validation("Only image files are allowed"));
        }
        if bytes.is_empty() {
            return Err(DomainError::validation("Image payload is empty"));
        }
        if bytes.len() > MAX_POSTER_BYTES {
            return Err(DomainError::validation(format!(
                "Image exceeds the {} byte limit",
                MAX_POSTER_BYTES
            )));
        }

        Ok(Self {
            content_type: mime,
            bytes,
        })
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
