//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

impl AuthResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMovieRequest {
    pub title: String,
    pub publishing_year: i32,
    #[serde(default)]
    pub poster: Option<String>,
}

/// Partial update. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMovieRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publishing_year: Option<i32>,
    /// Absent keeps the poster; `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub poster: Option<Option<String>>,
}

/// Marks a field that was present in the payload, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub publishing_year: i32,
    pub poster: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of the caller's movies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieListResponse {
    pub data: Vec<MovieResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

/// Query string for `GET /movies`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListMoviesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_request_is_camel_case() {
        let req: CreateMovieRequest =
            serde_json::from_str(r#"{"title":"Dune","publishingYear":2021}"#).unwrap();
        assert_eq!(req.publishing_year, 2021);
        assert_eq!(req.poster, None);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let owner = r#"{"title":"Dune","publishingYear":2021,"userId":"x"}"#;
        assert!(serde_json::from_str::<CreateMovieRequest>(owner).is_err());
        assert!(serde_json::from_str::<UpdateMovieRequest>(r#"{"userId":"x"}"#).is_err());
    }

    #[test]
    fn test_update_poster_null_differs_from_absent() {
        let absent: UpdateMovieRequest = serde_json::from_str(r#"{"title":"Dune"}"#).unwrap();
        assert_eq!(absent.poster, None);

        let cleared: UpdateMovieRequest = serde_json::from_str(r#"{"poster":null}"#).unwrap();
        assert_eq!(cleared.poster, Some(None));

        let set: UpdateMovieRequest = serde_json::from_str(r#"{"poster":"https://p"}"#).unwrap();
        assert_eq!(set.poster, Some(Some("https://p".to_string())));
    }

    #[test]
    fn test_auth_response_wire_names() {
        let json = serde_json::to_value(AuthResponse::bearer("t".to_string(), 60)).unwrap();
        assert_eq!(json["accessToken"], "t");
        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["expiresIn"], 60);
    }

    #[test]
    fn test_movie_response_keeps_null_poster() {
        let movie = MovieResponse {
            id: Uuid::nil(),
            title: "Dune".to_string(),
            publishing_year: 2021,
            poster: None,
            user_id: Uuid::nil(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(movie).unwrap();
        assert!(json["poster"].is_null());
        assert!(json.get("publishingYear").is_some());
        assert!(json.get("userId").is_some());
    }
}
