//! Canonical reference data: tags and fiction types
//!
//! Reference rows are deduplicated by canonical form. Resolution is
//! find-or-create: a lookup first, then an insert that treats a unique
//! violation as "someone else created it, reuse theirs" and re-reads. These
//! functions take `&mut SqliteConnection` so they participate in the parent
//! write's transaction.

use crate::models::{FictionTypeRow, TagRow};
use ficrec_core::{canonical_fiction_type, canonical_tag, slugify};
use sqlx::SqliteConnection;

/// Resolve a raw tag string to its canonical row, creating it if needed.
pub async fn resolve_tag(conn: &mut SqliteConnection, raw: &str) -> Result<TagRow, sqlx::Error> {
    let name = canonical_tag(raw);

    if let Some(existing) = find_tag(conn, &name).await? {
        return Ok(existing);
    }

    insert_or_reuse_tag(conn, &name).await
}

/// Resolve a list of raw tags, collapsing entries that canonicalize to the
/// same name. Order of first appearance is preserved.
pub async fn resolve_tags(
    conn: &mut SqliteConnection,
    raw_tags: &[String],
) -> Result<Vec<TagRow>, sqlx::Error> {
    let mut seen: Vec<String> = Vec::new();
    let mut resolved = Vec::new();

    for raw in raw_tags {
        let name = canonical_tag(raw);
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        resolved.push(resolve_tag(conn, raw).await?);
    }

    Ok(resolved)
}

/// Resolve a raw fiction type label to the canonical row, creating it if
/// needed.
pub async fn resolve_fiction_type(
    conn: &mut SqliteConnection,
    raw: &str,
) -> Result<FictionTypeRow, sqlx::Error> {
    let name = canonical_fiction_type(raw);

    if let Some(existing) = find_fiction_type(conn, &name).await? {
        return Ok(existing);
    }

    insert_or_reuse_fiction_type(conn, &name).await
}

/// Look up a tag by its canonical name.
pub async fn find_tag(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<TagRow>, sqlx::Error> {
    sqlx::query_as::<_, TagRow>("SELECT id, name FROM tag WHERE name = ?")
        .bind(name)
        .fetch_optional(conn)
        .await
}

/// Insert a tag; on a unique violation reuse the row that won the race.
pub async fn insert_or_reuse_tag(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<TagRow, sqlx::Error> {
    let inserted = sqlx::query_as::<_, TagRow>("INSERT INTO tag (name) VALUES (?) RETURNING id, name")
        .bind(name)
        .fetch_one(&mut *conn)
        .await;

    match inserted {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            find_tag(conn, name).await?.ok_or(sqlx::Error::RowNotFound)
        }
        Err(e) => Err(e),
    }
}

/// Look up a fiction type by its canonical name.
pub async fn find_fiction_type(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<FictionTypeRow>, sqlx::Error> {
    sqlx::query_as::<_, FictionTypeRow>("SELECT id, name, slug FROM fiction_type WHERE name = ?")
        .bind(name)
        .fetch_optional(conn)
        .await
}

/// Look up a fiction type by slug.
pub async fn fiction_type_by_slug(
    conn: &mut SqliteConnection,
    slug: &str,
) -> Result<Option<FictionTypeRow>, sqlx::Error> {
    sqlx::query_as::<_, FictionTypeRow>("SELECT id, name, slug FROM fiction_type WHERE slug = ?")
        .bind(slug)
        .fetch_optional(conn)
        .await
}

/// Look up a fiction type by id.
pub async fn fiction_type_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<FictionTypeRow>, sqlx::Error> {
    sqlx::query_as::<_, FictionTypeRow>("SELECT id, name, slug FROM fiction_type WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Insert a fiction type; on a unique violation reuse the winner's row.
pub async fn insert_or_reuse_fiction_type(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<FictionTypeRow, sqlx::Error> {
    let slug = slugify(name);

    let inserted = sqlx::query_as::<_, FictionTypeRow>(
        "INSERT INTO fiction_type (name, slug) VALUES (?, ?) RETURNING id, name, slug",
    )
    .bind(name)
    .bind(&slug)
    .fetch_one(&mut *conn)
    .await;

    match inserted {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => find_fiction_type(conn, name)
            .await?
            .ok_or(sqlx::Error::RowNotFound),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        schema::init(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_resolve_tag_creates_then_reuses() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let first = resolve_tag(&mut conn, " Sci Fy ").await.unwrap();
        assert_eq!(first.name, "sci-fy");

        let second = resolve_tag(&mut conn, "sci-fy").await.unwrap();
        assert_eq!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_insert_or_reuse_tag_survives_a_lost_race() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        // Another writer got there first.
        let winner = insert_or_reuse_tag(&mut conn, "fantasy").await.unwrap();

        let reused = insert_or_reuse_tag(&mut conn, "fantasy").await.unwrap();
        assert_eq!(reused.id, winner.id);
    }

    #[tokio::test]
    async fn test_resolve_tags_collapses_duplicates_in_one_request() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let raw = vec![
            "Sci-Fy".to_string(),
            " sci-fy ".to_string(),
            "drama".to_string(),
        ];
        let resolved = resolve_tags(&mut conn, &raw).await.unwrap();

        let names: Vec<&str> = resolved.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["sci-fy", "drama"]);
    }

    #[tokio::test]
    async fn test_resolve_fiction_type_derives_slug() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let row = resolve_fiction_type(&mut conn, "  Video  Game ").await.unwrap();
        assert_eq!(row.name, "video game");
        assert_eq!(row.slug, "video-game");

        let again = resolve_fiction_type(&mut conn, "video game").await.unwrap();
        assert_eq!(again.id, row.id);

        let by_slug = fiction_type_by_slug(&mut conn, "video-game")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_slug.id, row.id);
    }

    #[tokio::test]
    async fn test_insert_or_reuse_fiction_type_survives_a_lost_race() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let winner = insert_or_reuse_fiction_type(&mut conn, "movie").await.unwrap();
        let reused = insert_or_reuse_fiction_type(&mut conn, "movie").await.unwrap();
        assert_eq!(reused.id, winner.id);
    }
}
