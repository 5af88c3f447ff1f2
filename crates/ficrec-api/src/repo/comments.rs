//! Comment persistence

use crate::models::CommentRow;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, content, published, updated, user_id, recommendation_id";

/// Find a comment by id, scoped to its recommendation.
pub async fn find_by_id_for_recommendation(
    pool: &SqlitePool,
    recommendation_id: i64,
    comment_id: i64,
) -> Result<Option<CommentRow>, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(&format!(
        "SELECT {COLUMNS} FROM comment WHERE id = ? AND recommendation_id = ?"
    ))
    .bind(comment_id)
    .bind(recommendation_id)
    .fetch_optional(pool)
    .await
}

/// List a recommendation's comments.
///
/// `by_published_date_descending`: `None` orders by id ascending,
/// `Some(false)` by publish date ascending, `Some(true)` newest first.
pub async fn list(
    pool: &SqlitePool,
    recommendation_id: i64,
    by_published_date_descending: Option<bool>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<CommentRow>, sqlx::Error> {
    let order = match by_published_date_descending {
        None => "id ASC",
        Some(false) => "published ASC",
        Some(true) => "published DESC",
    };

    sqlx::query_as::<_, CommentRow>(&format!(
        "SELECT {COLUMNS} FROM comment WHERE recommendation_id = ? ORDER BY {order} LIMIT ? OFFSET ?"
    ))
    .bind(recommendation_id)
    .bind(limit.unwrap_or(-1))
    .bind(offset.unwrap_or(0))
    .fetch_all(pool)
    .await
}

/// Insert a new comment.
pub async fn insert(
    pool: &SqlitePool,
    content: &str,
    published: DateTime<Utc>,
    user_id: i64,
    recommendation_id: i64,
) -> Result<CommentRow, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(&format!(
        r#"
        INSERT INTO comment (content, published, user_id, recommendation_id)
        VALUES (?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(content)
    .bind(published)
    .bind(user_id)
    .bind(recommendation_id)
    .fetch_one(pool)
    .await
}

/// Replace a comment's content and stamp the update time.
pub async fn update_content(
    pool: &SqlitePool,
    id: i64,
    content: &str,
    updated: DateTime<Utc>,
) -> Result<CommentRow, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(&format!(
        r#"
        UPDATE comment SET content = ?, updated = ? WHERE id = ?
        RETURNING {COLUMNS}
        "#
    ))
    .bind(content)
    .bind(updated)
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Delete a comment.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comment WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
