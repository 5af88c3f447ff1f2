//! Recommendation persistence

use crate::models::{FictionTypeRow, RecommendationRead, RecommendationRow, TagRow};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str =
    "id, title, short_description, opinion, published, updated, user_id, fiction_type_id";

/// Find a recommendation by id.
pub async fn find_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<RecommendationRow>, sqlx::Error> {
    sqlx::query_as::<_, RecommendationRow>(&format!(
        "SELECT {COLUMNS} FROM recommendation WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List recommendations, oldest first. `limit: None` means no limit.
pub async fn list(
    pool: &SqlitePool,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<RecommendationRow>, sqlx::Error> {
    sqlx::query_as::<_, RecommendationRow>(&format!(
        "SELECT {COLUMNS} FROM recommendation ORDER BY id ASC LIMIT ? OFFSET ?"
    ))
    .bind(limit.unwrap_or(-1))
    .bind(offset.unwrap_or(0))
    .fetch_all(pool)
    .await
}

/// List recommendations of one fiction type, oldest first.
pub async fn list_by_fiction_type(
    pool: &SqlitePool,
    fiction_type_id: i64,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<RecommendationRow>, sqlx::Error> {
    sqlx::query_as::<_, RecommendationRow>(&format!(
        "SELECT {COLUMNS} FROM recommendation WHERE fiction_type_id = ? ORDER BY id ASC LIMIT ? OFFSET ?"
    ))
    .bind(fiction_type_id)
    .bind(limit.unwrap_or(-1))
    .bind(offset.unwrap_or(0))
    .fetch_all(pool)
    .await
}

/// Insert a new recommendation.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    conn: &mut SqliteConnection,
    title: &str,
    short_description: &str,
    opinion: &str,
    published: DateTime<Utc>,
    user_id: i64,
    fiction_type_id: i64,
) -> Result<RecommendationRow, sqlx::Error> {
    sqlx::query_as::<_, RecommendationRow>(&format!(
        r#"
        INSERT INTO recommendation
            (title, short_description, opinion, published, user_id, fiction_type_id)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(title)
    .bind(short_description)
    .bind(opinion)
    .bind(published)
    .bind(user_id)
    .bind(fiction_type_id)
    .fetch_one(conn)
    .await
}

/// Apply a partial update; `None` fields keep their current value. The
/// `updated` timestamp is always stamped.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    title: Option<&str>,
    short_description: Option<&str>,
    opinion: Option<&str>,
    fiction_type_id: Option<i64>,
    updated: DateTime<Utc>,
) -> Result<RecommendationRow, sqlx::Error> {
    sqlx::query_as::<_, RecommendationRow>(&format!(
        r#"
        UPDATE recommendation
        SET title = COALESCE(?, title),
            short_description = COALESCE(?, short_description),
            opinion = COALESCE(?, opinion),
            fiction_type_id = COALESCE(?, fiction_type_id),
            updated = ?
        WHERE id = ?
        RETURNING {COLUMNS}
        "#
    ))
    .bind(title)
    .bind(short_description)
    .bind(opinion)
    .bind(fiction_type_id)
    .bind(updated)
    .bind(id)
    .fetch_one(conn)
    .await
}

/// Delete a recommendation; comments, reactions, and tag links cascade.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM recommendation WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Attach tags to a recommendation.
pub async fn link_tags(
    conn: &mut SqliteConnection,
    recommendation_id: i64,
    tag_ids: &[i64],
) -> Result<(), sqlx::Error> {
    for tag_id in tag_ids {
        sqlx::query(
            "INSERT INTO tagged_recommendations (recommendation_id, tag_id) VALUES (?, ?)",
        )
        .bind(recommendation_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Detach all tags from a recommendation.
pub async fn clear_tags(
    conn: &mut SqliteConnection,
    recommendation_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tagged_recommendations WHERE recommendation_id = ?")
        .bind(recommendation_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// The tags attached to a recommendation, in creation order.
pub async fn tags_for(
    pool: &SqlitePool,
    recommendation_id: i64,
) -> Result<Vec<TagRow>, sqlx::Error> {
    sqlx::query_as::<_, TagRow>(
        r#"
        SELECT tag.id, tag.name
        FROM tag
        JOIN tagged_recommendations ON tagged_recommendations.tag_id = tag.id
        WHERE tagged_recommendations.recommendation_id = ?
        ORDER BY tag.id ASC
        "#,
    )
    .bind(recommendation_id)
    .fetch_all(pool)
    .await
}

/// Load the fiction type and tags for a row and assemble the read model.
pub async fn read_model(
    pool: &SqlitePool,
    row: RecommendationRow,
) -> Result<RecommendationRead, sqlx::Error> {
    let fiction_type = sqlx::query_as::<_, FictionTypeRow>(
        "SELECT id, name, slug FROM fiction_type WHERE id = ?",
    )
    .bind(row.fiction_type_id)
    .fetch_one(pool)
    .await?;

    let tags = tags_for(pool, row.id).await?;

    Ok(RecommendationRead::assemble(row, fiction_type, tags))
}
