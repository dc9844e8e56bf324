use serde::{Deserialize, Serialize};

use crate::models::Blog;

// -- JWT Claims --

/// Session token claims. `sub` is the user id; the token is never stored,
/// its validity comes from the signature and `exp` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
}

// -- Errors --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable reason, present on validation failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

// -- Users / login --

/// Every field is optional on the wire so a missing one becomes a 400 with a
/// message instead of a body rejection.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

// -- Blogs --

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Clients send the whole blog back when liking it; only `likes` is applied.
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub likes: Option<i64>,
}

// -- Notes --

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub content: Option<String>,
    pub important: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub important: Option<bool>,
}

// -- Persons --

#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    pub name: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePersonRequest {
    pub number: Option<String>,
}

// -- Blog statistics --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: i64,
}

/// Aggregates over every stored blog. The `Option` fields are `null` when
/// there are no blogs at all.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlogSummary {
    pub total_likes: i64,
    pub favorite: Option<Blog>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}
