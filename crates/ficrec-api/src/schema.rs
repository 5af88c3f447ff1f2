//! Database schema
//!
//! Tables are created at startup. Uniqueness of usernames, emails, canonical
//! reference names, and one-reaction-per-user is enforced here so the
//! constraints hold even when concurrent writers race the application-level
//! checks. Cascade deletion of a user's or recommendation's dependents is
//! declared explicitly rather than left to application code.

use sqlx::SqlitePool;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fiction_type (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tag (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recommendation (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        short_description TEXT NOT NULL,
        opinion TEXT NOT NULL,
        published TEXT NOT NULL,
        updated TEXT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        fiction_type_id INTEGER NOT NULL REFERENCES fiction_type(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tagged_recommendations (
        recommendation_id INTEGER NOT NULL REFERENCES recommendation(id) ON DELETE CASCADE,
        tag_id INTEGER NOT NULL REFERENCES tag(id),
        PRIMARY KEY (recommendation_id, tag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comment (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        published TEXT NOT NULL,
        updated TEXT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recommendation_id INTEGER NOT NULL REFERENCES recommendation(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reaction (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        is_positive INTEGER NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recommendation_id INTEGER NOT NULL REFERENCES recommendation(id) ON DELETE CASCADE,
        UNIQUE (user_id, recommendation_id)
    )
    "#,
];

/// Create all tables if they do not exist yet.
pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
