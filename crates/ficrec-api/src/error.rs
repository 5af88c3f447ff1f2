//! API error handling
//!
//! Every failure a handler can produce maps onto one HTTP outcome with a
//! `{"detail": "..."}` body. Authentication failures additionally carry the
//! `WWW-Authenticate: Bearer` challenge header and never reveal whether the
//! username or the password (or the token) was the problem.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message
    pub detail: String,
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad username/password at login. Deliberately generic.
    #[error("Could not validate credentials")]
    InvalidCredentials,

    /// Any bearer-token verification failure: malformed, bad signature,
    /// expired, or unknown subject. Indistinguishable from the outside.
    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn recommendation_not_found(id: i64) -> Self {
        Self::NotFound(format!("Recommendation with id {id} was not found"))
    }

    pub fn comment_not_found(comment_id: i64, recommendation_id: i64) -> Self {
        Self::NotFound(format!(
            "Comment with id {comment_id} for recommendation with id {recommendation_id} was not found"
        ))
    }

    pub fn reaction_not_found(reaction_id: i64, recommendation_id: i64) -> Self {
        Self::NotFound(format!(
            "Reaction with id {reaction_id} for recommendation with id {recommendation_id} was not found"
        ))
    }

    /// Ownership failure. Only produced after the resource is known to exist.
    pub fn no_permission(verb: &str, kind: &str, id: i64) -> Self {
        Self::Forbidden(format!(
            "User has no permission to {verb} {kind} with id {id}"
        ))
    }

    pub fn duplicate(field: &str) -> Self {
        Self::Conflict(format!("Duplicate {field}"))
    }

    pub fn duplicate_reaction(recommendation_id: i64) -> Self {
        Self::Conflict(format!(
            "User already has a reaction for recommendation with id {recommendation_id}, creating another one will create conflict"
        ))
    }

    pub fn no_data() -> Self {
        Self::BadRequest("No data provided".to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            let body = ErrorBody {
                detail: "Internal server error".to_string(),
            };
            return (status, Json(body)).into_response();
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response();
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_share_a_message() {
        // No user enumeration: token and credential failures read the same.
        assert_eq!(
            AppError::InvalidCredentials.to_string(),
            AppError::InvalidToken.to_string()
        );
    }

    #[test]
    fn test_not_found_message_names_kind_and_id() {
        let err = AppError::recommendation_not_found(7);
        assert_eq!(err.to_string(), "Recommendation with id 7 was not found");
    }

    #[test]
    fn test_permission_message() {
        let err = AppError::no_permission("delete", "comment", 3);
        assert_eq!(
            err.to_string(),
            "User has no permission to delete comment with id 3"
        );
    }

    #[test]
    fn test_duplicate_detail() {
        assert_eq!(AppError::duplicate("username").to_string(), "Duplicate username");
        assert_eq!(AppError::duplicate("email").to_string(), "Duplicate email");
    }
}
