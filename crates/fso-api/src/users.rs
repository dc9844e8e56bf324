use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use tracing::info;

use fso_db::models::UserRow;
use fso_types::api::CreateUserRequest;
use fso_types::models::User;

use crate::auth::{AppState, hash_password};
use crate::convert;
use crate::error::ApiError;
use crate::validation::required_text;

/// GET /api/users: each user with the blogs and notes they own.
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state
        .with_store(|store| {
            store
                .list_users()?
                .into_iter()
                .map(|row| {
                    let blogs = store.blogs_by_owner(&row.id)?;
                    let notes = store.notes_by_owner(&row.id)?;
                    Ok(convert::user(row, blogs, notes))
                })
                .collect::<fso_db::Result<Vec<User>>>()
        })
        .await?;

    Ok(Json(users))
}

/// POST /api/users
///
/// Username charset and length, then password strength, are checked before
/// any hashing happens. Uniqueness is left to the store's constraint so two
/// racing sign-ups with the same name still end with exactly one account.
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let username = required_text("username", req.username)?;
    let password = required_text("password", req.password)?;

    state.usernames.check(&username)?;
    state.passwords.check(&password)?;

    let password_hash = hash_password(password).await?;

    let row = UserRow {
        id: convert::new_id(),
        username,
        name: req.name,
        password_hash,
        created_at: convert::now(),
    };

    let stored = row.clone();
    state.with_store(move |store| store.create_user(&stored)).await?;

    info!("User {} registered", row.username);

    Ok((StatusCode::CREATED, Json(convert::user(row, vec![], vec![]))))
}
