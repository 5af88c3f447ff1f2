//! Reaction handlers
//!
//! A reaction is a single like/dislike per user per recommendation. The
//! parent recommendation is checked first on every route; creating a second
//! reaction for the same user is a conflict, not an upsert.

use crate::auth::{ensure_owner, CurrentUser};
use crate::error::{AppError, ErrorBody};
use crate::extract::ValidatedJson;
use crate::models::{ReactionRead, ReactionRow};
use crate::repo;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReactionCreate {
    pub is_positive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReactionUpdate {
    pub is_positive: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListParams {
    pub is_positive: Option<bool>,
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

async fn find_reaction(
    state: &AppState,
    recommendation_id: i64,
    reaction_id: i64,
) -> Result<ReactionRow, AppError> {
    repo::reactions::find_by_id_for_recommendation(&state.db, recommendation_id, reaction_id)
        .await?
        .ok_or_else(|| AppError::reaction_not_found(reaction_id, recommendation_id))
}

/// List a recommendation's reactions, optionally filtered by polarity.
#[utoipa::path(
    get,
    path = "/recommendations/{recommendation_id}/reactions",
    responses(
        (status = 200, description = "Reactions", body = Vec<ReactionRead>),
        (status = 404, description = "Recommendation not found", body = ErrorBody),
    ),
    tag = "reactions"
)]
pub async fn list(
    State(state): State<AppState>,
    Path(recommendation_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ReactionRead>>, AppError> {
    params
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    ensure_recommendation_exists(&state, recommendation_id).await?;

    let rows = repo::reactions::list(
        &state.db,
        recommendation_id,
        params.is_positive,
        params.limit,
        params.offset,
    )
    .await?;

    Ok(Json(rows.into_iter().map(ReactionRead::from).collect()))
}

/// Fetch one reaction.
#[utoipa::path(
    get,
    path = "/recommendations/{recommendation_id}/reactions/{reaction_id}",
    responses(
        (status = 200, description = "Reaction", body = ReactionRead),
        (status = 404, description = "Recommendation or reaction not found", body = ErrorBody),
    ),
    tag = "reactions"
)]
pub async fn get(
    State(state): State<AppState>,
    Path((recommendation_id, reaction_id)): Path<(i64, i64)>,
) -> Result<Json<ReactionRead>, AppError> {
    ensure_recommendation_exists(&state, recommendation_id).await?;
    let reaction = find_reaction(&state, recommendation_id, reaction_id).await?;
    Ok(Json(reaction.into()))
}

/// React to a recommendation as the authenticated user.
#[utoipa::path(
    post,
    path = "/recommendations/{recommendation_id}/reactions",
    request_body = ReactionCreate,
    responses(
        (status = 201, description = "Created", body = ReactionRead),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Recommendation not found", body = ErrorBody),
        (status = 409, description = "User already reacted", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "reactions"
)]
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(recommendation_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<ReactionCreate>,
) -> Result<(StatusCode, Json<ReactionRead>), AppError> {
    ensure_recommendation_exists(&state, recommendation_id).await?;

    if repo::reactions::find_by_user_and_recommendation(&state.db, user.id, recommendation_id)
        .await?
        .is_some()
    {
        return Err(AppError::duplicate_reaction(recommendation_id));
    }

    let row = match repo::reactions::insert(&state.db, body.is_positive, user.id, recommendation_id)
        .await
    {
        Ok(row) => row,
        // Two concurrent first reactions; the unique index decides.
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(AppError::duplicate_reaction(recommendation_id));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Change a reaction's polarity.
#[utoipa::path(
    put,
    path = "/recommendations/{recommendation_id}/reactions/{reaction_id}",
    request_body = ReactionUpdate,
    responses(
        (status = 200, description = "Updated", body = ReactionRead),
        (status = 403, description = "Not the reactor", body = ErrorBody),
        (status = 404, description = "Recommendation or reaction not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "reactions"
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((recommendation_id, reaction_id)): Path<(i64, i64)>,
    ValidatedJson(body): ValidatedJson<ReactionUpdate>,
) -> Result<Json<ReactionRead>, AppError> {
    ensure_recommendation_exists(&state, recommendation_id).await?;
    let reaction = find_reaction(&state, recommendation_id, reaction_id).await?;

    ensure_owner(&user, reaction.user_id, "update", "reaction", reaction_id)?;

    let row = repo::reactions::update(&state.db, reaction_id, body.is_positive).await?;

    Ok(Json(row.into()))
}

/// Delete a reaction.
#[utoipa::path(
    delete,
    path = "/recommendations/{recommendation_id}/reactions/{reaction_id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the reactor", body = ErrorBody),
        (status = 404, description = "Recommendation or reaction not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "reactions"
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((recommendation_id, reaction_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    ensure_recommendation_exists(&state, recommendation_id).await?;
    let reaction = find_reaction(&state, recommendation_id, reaction_id).await?;

    ensure_owner(&user, reaction.user_id, "delete", "reaction", reaction_id)?;

    repo::reactions::delete(&state.db, reaction_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
