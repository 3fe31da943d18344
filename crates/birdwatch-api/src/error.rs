//! Error types for the owner API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the same shape:
//!
//! ```json
//! { "status": 404, "error": "Not Found", "message": "...", "timestamp": "..." }
//! ```

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use birdwatch_db::DbError;

use crate::password::PasswordError;

/// Realm advertised in `WWW-Authenticate` challenges.
pub const AUTH_REALM: &str = r#"Basic realm="birdwatch""#;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request payload failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request collides with existing data (e.g. a taken username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Credentials were missing, malformed or wrong.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// The data layer failed.
    #[error("database error: {0}")]
    Database(DbError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(constraint) => {
                Self::Conflict(format!("value already in use ({constraint})"))
            }
            other => Self::Database(other),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl ApiError {
    /// HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::InvalidUuid(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::Unauthorized(msg)
            | Self::InvalidUuid(msg) => msg.clone(),
            // Internal details go to the log, not to the client.
            Self::Database(e) => {
                tracing::error!(error = %e, "Database failure while handling request");
                String::from("database unavailable")
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal failure while handling request");
                String::from("internal error")
            }
        };

        let body = serde_json::json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Unknown"),
            "message": message,
            "timestamp": chrono::Local::now().naive_local(),
        });

        let mut response = (status, axum::Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(AUTH_REALM),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(ApiError::NotFound(String::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Validation(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict(String::new()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Unauthorized(String::new()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn unique_violation_becomes_conflict() {
        let err = ApiError::from(DbError::UniqueViolation(String::from("users_email_key")));
        assert!(matches!(err, ApiError::Conflict(msg) if msg.contains("users_email_key")));
    }

    #[test]
    fn password_failure_is_internal() {
        let err = ApiError::from(PasswordError::from(bcrypt::BcryptError::CostNotAllowed(1)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_response_carries_challenge() {
        let response = ApiError::Unauthorized(String::from("no credentials")).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static(AUTH_REALM))
        );
    }
}
