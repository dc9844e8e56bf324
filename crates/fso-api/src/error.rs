//! The one place where failures become HTTP responses.
//!
//! Handlers return `Result<_, ApiError>` and lean on `?`; store errors and
//! body rejections are converted here, so no handler matches on error kinds.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use fso_types::api::ErrorResponse;

use crate::validation::Rejection;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Path id is not a syntactically valid identifier.
    #[error("malformatted id")]
    MalformedId,

    #[error(transparent)]
    Invalid(#[from] Rejection),

    /// Body could not be read as the expected JSON.
    #[error("{0}")]
    BadBody(String),

    #[error("expected `{0}` to be unique")]
    Duplicate(String),

    #[error("token missing")]
    TokenMissing,

    #[error("token invalid")]
    TokenInvalid,

    #[error("token expired")]
    TokenExpired,

    /// Token verified but its subject no longer exists.
    #[error("user not found")]
    UnknownUser,

    #[error("invalid username or password")]
    BadCredentials,

    #[error("only the owner can modify this resource")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("unknown endpoint")]
    UnknownEndpoint,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedId | Self::Invalid(_) | Self::BadBody(_) | Self::Duplicate(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::TokenMissing
            | Self::TokenInvalid
            | Self::TokenExpired
            | Self::UnknownUser
            | Self::BadCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound | Self::UnknownEndpoint => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Internal(err) => {
                error!("Internal error: {:#}", err);
                ErrorResponse {
                    error: "internal server error".into(),
                    code: None,
                }
            }
            Self::Invalid(rejection) => {
                debug!("Rejected {}: {}", rejection.field, rejection.message);
                ErrorResponse {
                    error: rejection.message.clone(),
                    code: Some(rejection.reason.code().into()),
                }
            }
            other => {
                debug!("Request failed with {}: {}", status, other);
                ErrorResponse {
                    error: other.to_string(),
                    code: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<fso_db::Error> for ApiError {
    fn from(err: fso_db::Error) -> Self {
        match err {
            fso_db::Error::Conflict { field } => Self::Duplicate(field),
            other => Self::Internal(other.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadBody(rejection.body_text())
    }
}

/// Router fallback for anything no route matched.
pub async fn unknown_endpoint() -> ApiError {
    ApiError::UnknownEndpoint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Reason;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(ApiError::MalformedId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Duplicate("username".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::TokenInvalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::UnknownEndpoint.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unique_violation_becomes_a_duplicate() {
        let err = ApiError::from(fso_db::Error::Conflict {
            field: "username".into(),
        });
        assert_eq!(err.to_string(), "expected `username` to be unique");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_store_failures_are_internal() {
        let err = ApiError::from(fso_db::Error::LockPoisoned);
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn validation_carries_its_reason() {
        let err = ApiError::from(Rejection::new(
            "password",
            Reason::MissingDigit,
            "password must contain at least one digit",
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "password must contain at least one digit");
    }
}
