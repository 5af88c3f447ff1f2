//! Recommendation handlers
//!
//! Mutations follow a fixed check order: existence first (404), then
//! ownership (403), then payload checks. Creation and update run their
//! reference-data resolution and row writes inside one transaction.

use crate::auth::{ensure_owner, CurrentUser};
use crate::error::{AppError, ErrorBody};
use crate::extract::ValidatedJson;
use crate::models::RecommendationRead;
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
pub struct RecommendationCreate {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub short_description: String,
    #[validate(length(min = 1))]
    pub opinion: String,
    /// Fiction type label, stored in canonical lowercased form
    #[validate(length(min = 4, max = 255))]
    pub fiction_type: String,
    #[validate(length(min = 1))]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecommendationUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub short_description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub opinion: Option<String>,
    #[serde(default)]
    #[validate(length(min = 4, max = 255))]
    pub fiction_type: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub tags: Option<Vec<String>>,
}

impl RecommendationUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.short_description.is_none()
            && self.opinion.is_none()
            && self.fiction_type.is_none()
            && self.tags.is_none()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListParams {
    /// Filter by fiction type slug
    pub fiction_type_slug: Option<String>,
    #[validate(range(min = 1))]
    pub limit: Option<i64>,
    #[validate(range(min = 1))]
    pub offset: Option<i64>,
}

/// List recommendations, optionally filtered by fiction type slug.
///
/// An unknown slug is not an error; it simply matches nothing.
#[utoipa::path(
    get,
    path = "/recommendations",
    responses(
        (status = 200, description = "Recommendations", body = Vec<RecommendationRead>),
    ),
    tag = "recommendations"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RecommendationRead>>, AppError> {
    params
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let rows = match &params.fiction_type_slug {
        Some(slug) => {
            let fiction_type = {
                let mut conn = state.db.acquire().await?;
                repo::refdata::fiction_type_by_slug(&mut conn, slug).await?
            };
            match fiction_type {
                Some(fiction_type) => {
                    repo::recommendations::list_by_fiction_type(
                        &state.db,
                        fiction_type.id,
                        params.limit,
                        params.offset,
                    )
                    .await?
                }
                None => Vec::new(),
            }
        }
        None => repo::recommendations::list(&state.db, params.limit, params.offset).await?,
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(repo::recommendations::read_model(&state.db, row).await?);
    }

    Ok(Json(out))
}

/// Fetch one recommendation with its fiction type and tags.
#[utoipa::path(
    get,
    path = "/recommendations/{id}",
    responses(
        (status = 200, description = "Recommendation", body = RecommendationRead),
        (status = 404, description = "Not found", body = ErrorBody),
    ),
    tag = "recommendations"
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecommendationRead>, AppError> {
    let row = repo::recommendations::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::recommendation_not_found(id))?;

    Ok(Json(repo::recommendations::read_model(&state.db, row).await?))
}

/// Create a recommendation owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/recommendations",
    request_body = RecommendationCreate,
    responses(
        (status = 201, description = "Created", body = RecommendationRead),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "recommendations"
)]
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(body): ValidatedJson<RecommendationCreate>,
) -> Result<(StatusCode, Json<RecommendationRead>), AppError> {
    let mut tx = state.db.begin().await?;

    let tags = repo::refdata::resolve_tags(&mut tx, &body.tags).await?;
    let fiction_type = repo::refdata::resolve_fiction_type(&mut tx, &body.fiction_type).await?;

    let row = repo::recommendations::insert(
        &mut tx,
        &body.title,
        &body.short_description,
        &body.opinion,
        Utc::now(),
        user.id,
        fiction_type.id,
    )
    .await?;

    let tag_ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
    repo::recommendations::link_tags(&mut tx, row.id, &tag_ids).await?;

    tx.commit().await?;

    tracing::info!(recommendation_id = row.id, user_id = user.id, "recommendation created");

    let read = RecommendationRead::assemble(row, fiction_type, tags);
    Ok((StatusCode::CREATED, Json(read)))
}

/// Partially update a recommendation.
#[utoipa::path(
    patch,
    path = "/recommendations/{id}",
    request_body = RecommendationUpdate,
    responses(
        (status = 200, description = "Updated", body = RecommendationRead),
        (status = 400, description = "Empty update", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "recommendations"
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<RecommendationUpdate>,
) -> Result<Json<RecommendationRead>, AppError> {
    let existing = repo::recommendations::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::recommendation_not_found(id))?;

    ensure_owner(&user, existing.user_id, "update", "recommendation", id)?;

    if body.is_empty() {
        return Err(AppError::no_data());
    }

    let mut tx = state.db.begin().await?;

    let fiction_type_id = match &body.fiction_type {
        Some(label) => Some(repo::refdata::resolve_fiction_type(&mut tx, label).await?.id),
        None => None,
    };

    let row = repo::recommendations::update(
        &mut tx,
        id,
        body.title.as_deref(),
        body.short_description.as_deref(),
        body.opinion.as_deref(),
        fiction_type_id,
        Utc::now(),
    )
    .await?;

    if let Some(raw_tags) = &body.tags {
        let tags = repo::refdata::resolve_tags(&mut tx, raw_tags).await?;
        repo::recommendations::clear_tags(&mut tx, id).await?;
        let tag_ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
        repo::recommendations::link_tags(&mut tx, id, &tag_ids).await?;
    }

    tx.commit().await?;

    Ok(Json(repo::recommendations::read_model(&state.db, row).await?))
}

/// Delete a recommendation and everything attached to it.
#[utoipa::path(
    delete,
    path = "/recommendations/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "recommendations"
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let existing = repo::recommendations::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::recommendation_not_found(id))?;

    ensure_owner(&user, existing.user_id, "delete", "recommendation", id)?;

    repo::recommendations::delete(&state.db, id).await?;
    tracing::info!(recommendation_id = id, user_id = user.id, "recommendation deleted");

    Ok(StatusCode::NO_CONTENT)
}
