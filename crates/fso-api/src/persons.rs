//! Phonebook. Entries have no owner, so none of these routes need a token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use axum_extra::extract::WithRejection;
use tracing::info;

use fso_db::models::PersonRow;
use fso_types::api::{CreatePersonRequest, UpdatePersonRequest};
use fso_types::models::Person;

use crate::auth::AppState;
use crate::convert::{self, parse_id};
use crate::error::ApiError;
use crate::validation::{self, required_text};

pub async fn list_persons(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state.with_store(|store| store.list_persons()).await?;
    let persons: Vec<Person> = rows.into_iter().map(convert::person).collect();
    Ok(Json(persons))
}

pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let row = state
        .with_store(move |store| store.get_person(&id))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(convert::person(row)))
}

/// Names are unique; a second entry with the same name is a 400.
pub async fn create_person(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreatePersonRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let name = required_text("name", req.name)?;
    let number = required_text("number", req.number)?;
    validation::person_name(&name)?;
    validation::phone_number(&number)?;

    let row = PersonRow {
        id: convert::new_id(),
        name,
        number,
    };

    let stored = row.clone();
    state.with_store(move |store| store.insert_person(&stored)).await?;

    info!("Person {} added", row.name);

    Ok((StatusCode::CREATED, Json(convert::person(row))))
}

/// Replaces the number; the name is the entry's identity.
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdatePersonRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let number = required_text("number", req.number)?;
    validation::phone_number(&number)?;

    let updated = state
        .with_store(move |store| store.update_person_number(&id, &number))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(convert::person(updated)))
}

pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    if !state.with_store(move |store| store.delete_person(&id)).await? {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /info: headcount and server time.
pub async fn info(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let count = state.with_store(|store| store.count_persons()).await?;
    let now = chrono::Utc::now().to_rfc2822();

    Ok(Html(format!(
        "<div>\n  <h1>Phonebook has info for {count} people</h1>\n  <p>{now}</p>\n</div>\n"
    )))
}
