//! Authentication middleware for protected routes
//!
//! Extracts the bearer token from the Authorization header, validates it, and
//! resolves the subject to a live user row. Every failure along the way -
//! missing header, malformed token, bad signature, expiry, deleted user -
//! produces the same 401 with a `WWW-Authenticate: Bearer` challenge. On
//! success the resolved [`CurrentUser`] is added to request extensions for
//! handlers to pick up via `Extension<CurrentUser>`.

use super::jwt::verify_token;
use crate::error::AppError;
use crate::models::UserRow;
use crate::repo;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// The authenticated identity acting in this request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<UserRow> for CurrentUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
        }
    }
}

/// Require a valid bearer token and resolve it to a user.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidToken)?;

    let claims = verify_token(&state.config.auth, token).map_err(|e| {
        tracing::debug!(reason = %e, "token rejected");
        AppError::InvalidToken
    })?;

    let user_id = claims.subject()?;

    // The subject must still exist; a token for a deleted user is dead.
    let user = repo::users::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::InvalidToken)?;

    request.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(request).await)
}

impl From<super::jwt::JwtError> for AppError {
    fn from(_: super::jwt::JwtError) -> Self {
        AppError::InvalidToken
    }
}
