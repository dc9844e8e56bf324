use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use fso_db::models::NoteRow;
use fso_types::api::{CreateNoteRequest, UpdateNoteRequest};
use fso_types::models::Note;

use crate::auth::AppState;
use crate::convert::{self, parse_id};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validation::{self, required, required_text};

pub async fn list_notes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state.with_store(|store| store.list_notes()).await?;
    let notes: Vec<Note> = rows.into_iter().map(convert::note).collect();
    Ok(Json(notes))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let row = state
        .with_store(move |store| store.get_note(&id))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(convert::note(row)))
}

pub async fn create_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<CreateNoteRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let content = required_text("content", req.content)?;
    validation::note_content(&content)?;

    let row = NoteRow {
        id: convert::new_id(),
        content,
        important: req.important.unwrap_or(false),
        user_id: Some(user.id),
        date: convert::now(),
    };

    let stored = row.clone();
    state.with_store(move |store| store.insert_note(&stored)).await?;

    info!("Note {} created by {}", row.id, user.username);

    Ok((StatusCode::CREATED, Json(convert::note(row))))
}

/// Toggles importance. Content and owner stay as they are.
pub async fn update_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateNoteRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    owned_note(&state, &id, &user.id).await?;

    let important = required("important", req.important)?;

    let updated = state
        .with_store(move |store| store.update_note_importance(&id, important))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(convert::note(updated)))
}

pub async fn delete_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    owned_note(&state, &id, &user.id).await?;

    let target = id.clone();
    if !state.with_store(move |store| store.delete_note(&target)).await? {
        return Err(ApiError::NotFound);
    }

    info!("Note {} deleted by {}", id, user.username);
    Ok(StatusCode::NO_CONTENT)
}

async fn owned_note(state: &AppState, id: &str, user_id: &str) -> Result<NoteRow, ApiError> {
    let lookup = id.to_string();
    let row = state
        .with_store(move |store| store.get_note(&lookup))
        .await?
        .ok_or(ApiError::NotFound)?;

    if row.user_id.as_deref() != Some(user_id) {
        return Err(ApiError::Forbidden);
    }
    Ok(row)
}
