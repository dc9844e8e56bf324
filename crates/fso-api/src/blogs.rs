use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use fso_db::models::BlogRow;
use fso_types::api::{BlogSummary, CreateBlogRequest, UpdateBlogRequest};
use fso_types::models::Blog;

use crate::auth::AppState;
use crate::convert::{self, parse_id};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::stats;
use crate::validation::{self, required, required_text};

/// GET /api/blogs
pub async fn list_blogs(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state.with_store(|store| store.list_blogs()).await?;
    let blogs: Vec<Blog> = rows.into_iter().map(convert::blog).collect();
    Ok(Json(blogs))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let row = state
        .with_store(move |store| store.get_blog(&id))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(convert::blog(row)))
}

/// POST /api/blogs. The caller becomes the owner.
pub async fn create_blog(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<CreateBlogRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let title = required_text("title", req.title)?;
    let url = required_text("url", req.url)?;
    let likes = req.likes.unwrap_or(0);
    validation::likes(likes)?;

    let row = BlogRow {
        id: convert::new_id(),
        title,
        author: req.author.unwrap_or_default(),
        url,
        likes,
        user_id: Some(user.id),
        created_at: convert::now(),
    };

    let stored = row.clone();
    state.with_store(move |store| store.insert_blog(&stored)).await?;

    info!("Blog {} created by {}", row.id, user.username);

    Ok((StatusCode::CREATED, Json(convert::blog(row))))
}

/// PUT /api/blogs/{id}. Only `likes` is applied; the owner never changes.
pub async fn update_blog(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateBlogRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    owned_blog(&state, &id, &user.id).await?;

    let likes = required("likes", req.likes)?;
    validation::likes(likes)?;

    let updated = state
        .with_store(move |store| store.update_blog_likes(&id, likes))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(convert::blog(updated)))
}

/// DELETE /api/blogs/{id}
pub async fn delete_blog(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    owned_blog(&state, &id, &user.id).await?;

    let target = id.clone();
    // The row can vanish between the ownership check and here.
    if !state.with_store(move |store| store.delete_blog(&target)).await? {
        return Err(ApiError::NotFound);
    }

    info!("Blog {} deleted by {}", id, user.username);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/blogs/summary
pub async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state.with_store(|store| store.list_blogs()).await?;
    let blogs: Vec<Blog> = rows.into_iter().map(convert::blog).collect();

    Ok(Json(BlogSummary {
        total_likes: stats::total_likes(&blogs),
        favorite: stats::favorite_blog(&blogs).cloned(),
        most_blogs: stats::most_blogs(&blogs),
        most_likes: stats::most_likes(&blogs),
    }))
}

/// Load a blog and make sure `user_id` owns it. Missing beats forbidden.
async fn owned_blog(state: &AppState, id: &str, user_id: &str) -> Result<BlogRow, ApiError> {
    let lookup = id.to_string();
    let row = state
        .with_store(move |store| store.get_blog(&lookup))
        .await?
        .ok_or(ApiError::NotFound)?;

    if row.user_id.as_deref() != Some(user_id) {
        return Err(ApiError::Forbidden);
    }
    Ok(row)
}
