use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use tracing::{error, info};

use fso_db::Store;
use fso_types::api::{Claims, LoginRequest, LoginResponse};

use crate::error::ApiError;
use crate::validation::{PasswordPolicy, UsernamePolicy};

pub type AppState = Arc<AppStateInner>;

/// Verified against when the username is unknown, so a miss costs the same
/// Argon2 work as a wrong password. Matches no password.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$TUL/z9HmJyWa9XOVYNMK2Q$Ci3RArtDf69mk8ctshOGNVGVHQ8fIeeJm0gkn58rQLg";

pub struct AppStateInner {
    pub store: Arc<dyn Store>,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub passwords: PasswordPolicy,
    pub usernames: UsernamePolicy,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn Store>, jwt_secret: impl Into<String>) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.into(),
            token_ttl: chrono::Duration::hours(1),
            passwords: PasswordPolicy::default(),
            usernames: UsernamePolicy::default(),
        }
    }

    /// Run a blocking store call off the async runtime.
    pub async fn with_store<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn Store) -> fso_db::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                anyhow!("store task failed: {e}")
            })?;
        Ok(result?)
    }
}

/// Argon2id with a fresh salt, on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("password hashing failed: {e}"))
    })
    .await
    .map_err(|e| anyhow!("hashing task failed: {e}"))?
    .map_err(ApiError::from)
}

/// `Ok(false)` for a wrong password, `Err` only for an unreadable stored hash.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || -> Result<bool, ApiError> {
        let parsed = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow!("stored password hash is unreadable: {e}"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| anyhow!("verification task failed: {e}"))?
}

pub fn create_token(
    secret: &str,
    user_id: &str,
    username: &str,
    ttl: chrono::Duration,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: usize::try_from((chrono::Utc::now() + ttl).timestamp())?,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Signature and expiry check. Expiry is reported apart from every other
/// failure so clients can tell a stale session from a forged one.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::TokenExpired,
        _ => ApiError::TokenInvalid,
    })
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.clone();
    let user = state
        .with_store(move |store| store.get_user_by_username(&username))
        .await?;

    let stored_hash = user
        .as_ref()
        .map_or(DUMMY_HASH, |u| u.password_hash.as_str())
        .to_string();
    let matched = verify_password(req.password, stored_hash).await?;

    let Some(user) = user.filter(|_| matched) else {
        return Err(ApiError::BadCredentials);
    };

    let token = create_token(&state.jwt_secret, &user.id, &user.username, state.token_ttl)?;

    info!("User {} logged in", user.username);

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}
