//! Comment handlers
//!
//! Comments hang off a recommendation; every route verifies the parent
//! exists before looking at the comment itself, so a bad parent id always
//! reads as "recommendation not found".

use crate::auth::{ensure_owner, CurrentUser};
use crate::error::{AppError, ErrorBody};
use crate::extract::ValidatedJson;
use crate::models::{CommentRead, CommentRow};
use crate::repo;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CommentCreate {
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CommentUpdate {
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListParams {
    pub by_published_date_descending: Option<bool>,
    #[validate(range(min = 1))]
    pub limit: Option<i64>,
    #[validate(range(min = 1))]
    pub offset: Option<i64>,
}

async fn ensure_recommendation_exists(
    state: &AppState,
    recommendation_id: i64,
) -> Result<(), AppError> {
    repo::recommendations::find_by_id(&state.db, recommendation_id)
        .await?
        .ok_or_else(|| AppError::recommendation_not_found(recommendation_id))?;
    Ok(())
}

async fn find_comment(
    state: &AppState,
    recommendation_id: i64,
    comment_id: i64,
) -> Result<CommentRow, AppError> {
    repo::comments::find_by_id_for_recommendation(&state.db, recommendation_id, comment_id)
        .await?
        .ok_or_else(|| AppError::comment_not_found(comment_id, recommendation_id))
}

/// List a recommendation's comments.
#[utoipa::path(
    get,
    path = "/recommendations/{recommendation_id}/comments",
    responses(
        (status = 200, description = "Comments", body = Vec<CommentRead>),
        (status = 404, description = "Recommendation not found", body = ErrorBody),
    ),
    tag = "comments"
)]
pub async fn list(
    State(state): State<AppState>,
    Path(recommendation_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CommentRead>>, AppError> {
    params
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    ensure_recommendation_exists(&state, recommendation_id).await?;

    let rows = repo::comments::list(
        &state.db,
        recommendation_id,
        params.by_published_date_descending,
        params.limit,
        params.offset,
    )
    .await?;

    Ok(Json(rows.into_iter().map(CommentRead::from).collect()))
}

/// Fetch one comment.
#[utoipa::path(
    get,
    path = "/recommendations/{recommendation_id}/comments/{comment_id}",
    responses(
        (status = 200, description = "Comment", body = CommentRead),
        (status = 404, description = "Recommendation or comment not found", body = ErrorBody),
    ),
    tag = "comments"
)]
pub async fn get(
    State(state): State<AppState>,
    Path((recommendation_id, comment_id)): Path<(i64, i64)>,
) -> Result<Json<CommentRead>, AppError> {
    ensure_recommendation_exists(&state, recommendation_id).await?;
    let comment = find_comment(&state, recommendation_id, comment_id).await?;
    Ok(Json(comment.into()))
}

/// Comment on a recommendation as the authenticated user.
#[utoipa::path(
    post,
    path = "/recommendations/{recommendation_id}/comments",
    request_body = CommentCreate,
    responses(
        (status = 201, description = "Created", body = CommentRead),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Recommendation not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "comments"
)]
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(recommendation_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<CommentCreate>,
) -> Result<(StatusCode, Json<CommentRead>), AppError> {
    ensure_recommendation_exists(&state, recommendation_id).await?;

    let row = repo::comments::insert(
        &state.db,
        &body.content,
        Utc::now(),
        user.id,
        recommendation_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Replace a comment's content.
#[utoipa::path(
    put,
    path = "/recommendations/{recommendation_id}/comments/{comment_id}",
    request_body = CommentUpdate,
    responses(
        (status = 200, description = "Updated", body = CommentRead),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Recommendation or comment not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "comments"
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((recommendation_id, comment_id)): Path<(i64, i64)>,
    ValidatedJson(body): ValidatedJson<CommentUpdate>,
) -> Result<Json<CommentRead>, AppError> {
    ensure_recommendation_exists(&state, recommendation_id).await?;
    let comment = find_comment(&state, recommendation_id, comment_id).await?;

    ensure_owner(&user, comment.user_id, "update", "comment", comment_id)?;

    let row = repo::comments::update_content(&state.db, comment_id, &body.content, Utc::now())
        .await?;

    Ok(Json(row.into()))
}

/// Delete a comment.
#[utoipa::path(
    delete,
    path = "/recommendations/{recommendation_id}/comments/{comment_id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Recommendation or comment not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "comments"
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((recommendation_id, comment_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    ensure_recommendation_exists(&state, recommendation_id).await?;
    let comment = find_comment(&state, recommendation_id, comment_id).await?;

    ensure_owner(&user, comment.user_id, "delete", "comment", comment_id)?;

    repo::comments::delete(&state.db, comment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
