//! Reaction persistence
//!
//! Each user gets at most one reaction per recommendation; the schema
//! enforces it with a unique index over (user_id, recommendation_id).

use crate::models::ReactionRow;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, is_positive, user_id, recommendation_id";

/// Find a reaction by id, scoped to its recommendation.
pub async fn find_by_id_for_recommendation(
    pool: &SqlitePool,
    recommendation_id: i64,
    reaction_id: i64,
) -> Result<Option<ReactionRow>, sqlx::Error> {
    sqlx::query_as::<_, ReactionRow>(&format!(
        "SELECT {COLUMNS} FROM reaction WHERE id = ? AND recommendation_id = ?"
    ))
    .bind(reaction_id)
    .bind(recommendation_id)
    .fetch_optional(pool)
    .await
}

/// The reaction a user has left on a recommendation, if any.
pub async fn find_by_user_and_recommendation(
    pool: &SqlitePool,
    user_id: i64,
    recommendation_id: i64,
) -> Result<Option<ReactionRow>, sqlx::Error> {
    sqlx::query_as::<_, ReactionRow>(&format!(
        "SELECT {COLUMNS} FROM reaction WHERE user_id = ? AND recommendation_id = ?"
    ))
    .bind(user_id)
    .bind(recommendation_id)
    .fetch_optional(pool)
    .await
}

/// List a recommendation's reactions, optionally filtered by polarity.
pub async fn list(
    pool: &SqlitePool,
    recommendation_id: i64,
    is_positive: Option<bool>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<ReactionRow>, sqlx::Error> {
    let filter = match is_positive {
        Some(_) => " AND is_positive = ?",
        None => "",
    };

    let sql = format!(
        "SELECT {COLUMNS} FROM reaction WHERE recommendation_id = ?{filter} ORDER BY id ASC LIMIT ? OFFSET ?"
    );
    let mut query = sqlx::query_as::<_, ReactionRow>(&sql).bind(recommendation_id);

    if let Some(positive) = is_positive {
        query = query.bind(positive);
    }

    query
        .bind(limit.unwrap_or(-1))
        .bind(offset.unwrap_or(0))
        .fetch_all(pool)
        .await
}

/// Insert a new reaction.
pub async fn insert(
    pool: &SqlitePool,
    is_positive: bool,
    user_id: i64,
    recommendation_id: i64,
) -> Result<ReactionRow, sqlx::Error> {
    sqlx::query_as::<_, ReactionRow>(&format!(
        r#"
        INSERT INTO reaction (is_positive, user_id, recommendation_id)
        VALUES (?, ?, ?)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(is_positive)
    .bind(user_id)
    .bind(recommendation_id)
    .fetch_one(pool)
    .await
}

/// Flip or confirm a reaction's polarity.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    is_positive: bool,
) -> Result<ReactionRow, sqlx::Error> {
    sqlx::query_as::<_, ReactionRow>(&format!(
        "UPDATE reaction SET is_positive = ? WHERE id = ? RETURNING {COLUMNS}"
    ))
    .bind(is_positive)
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Delete a reaction.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM reaction WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
