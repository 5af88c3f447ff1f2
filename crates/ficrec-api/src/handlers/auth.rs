//! Authentication handlers

use crate::auth::{AuthService, CurrentUser, RegisterRequest, TokenForm, TokenResponse, UserUpdate};
use crate::error::{AppError, ErrorBody};
use crate::extract::ValidatedJson;
use crate::models::UserRead;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Extension, Form, Json};

/// Register a new user.
///
/// # Returns
/// * `201 Created` with the public profile
/// * `409 Conflict` when the username or email is taken
/// * `422 Unprocessable Entity` when a field fails validation
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserRead),
        (status = 409, description = "Duplicate username or email", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserRead>), AppError> {
    let user = AuthService::new(&state).register(request).await?;
    tracing::info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for an access token. The body is form-encoded.
#[utoipa::path(
    post,
    path = "/auth/token",
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Bad credentials", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = AuthService::new(&state).login(form).await?;
    Ok(Json(token))
}

/// The authenticated user's own profile.
#[utoipa::path(
    get,
    path = "/auth/users/me",
    responses(
        (status = 200, description = "Current user", body = UserRead),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<UserRead> {
    Json(UserRead {
        id: user.id,
        username: user.username,
        email: user.email,
    })
}

/// Update the authenticated user's username and/or email.
#[utoipa::path(
    patch,
    path = "/auth/users/me",
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated profile", body = UserRead),
        (status = 400, description = "Empty update", body = ErrorBody),
        (status = 409, description = "Duplicate username or email", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(update): ValidatedJson<UserUpdate>,
) -> Result<Json<UserRead>, AppError> {
    let updated = AuthService::new(&state).update_profile(user.id, update).await?;
    Ok(Json(updated))
}
