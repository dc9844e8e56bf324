use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::{AppState, verify_token};
use crate::error::ApiError;

/// The user a request was authenticated as. Lives in the request extensions
/// for that one request and is never cached across requests.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

/// Resolve an optional bearer token to a stored user.
///
/// No `Authorization: Bearer` header lets the request through anonymously;
/// routes that need a user reject later through [`AuthUser`]. A header that
/// is present but fails verification, or names a user that is gone, ends the
/// request here with 401.
pub async fn resolve_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(req.headers()) else {
        return Ok(next.run(req).await);
    };

    let claims = verify_token(&state.jwt_secret, &token)?;

    let user_id = claims.sub;
    let user = state
        .with_store(move |store| store.get_user_by_id(&user_id))
        .await?
        .ok_or(ApiError::UnknownUser)?;

    debug!("Request authenticated as {}", user.username);

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
        name: user.name,
    });
    Ok(next.run(req).await)
}

/// Scheme match is case-insensitive; `bearer abc` and `Bearer abc` both work.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_at_checked("bearer ".len())?;
    scheme
        .eq_ignore_ascii_case("bearer ")
        .then(|| token.trim().to_string())
}

/// Extractor for handlers that require an authenticated user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthUser)
            .ok_or(ApiError::TokenMissing)
    }
}
