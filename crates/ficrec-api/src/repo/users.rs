//! User persistence

use crate::models::UserRow;
use sqlx::SqlitePool;

/// Find a user by username.
pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, hashed_password FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Find a user by email.
pub async fn find_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, hashed_password FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Find a user by id.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, hashed_password FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Insert a new user and return the stored row.
pub async fn insert(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    hashed_password: &str,
) -> Result<UserRow, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (username, email, hashed_password)
        VALUES (?, ?, ?)
        RETURNING id, username, email, hashed_password
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .fetch_one(pool)
    .await
}

/// Apply a partial profile update. `None` fields keep their current value.
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<UserRow, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET username = COALESCE(?, username),
            email = COALESCE(?, email)
        WHERE id = ?
        RETURNING id, username, email, hashed_password
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(id)
    .fetch_one(pool)
    .await
}
