//! Database rows and response models
//!
//! Row structs map one-to-one onto the tables in [`crate::schema`]; read
//! models are what handlers serialize. The password hash lives only on
//! [`UserRow`] and never appears in a read model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// User row, including the credential hash
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
}

/// Public user profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserRead {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<UserRow> for UserRead {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
        }
    }
}

/// Fiction type row (canonical reference data)
#[derive(Debug, Clone, FromRow)]
pub struct FictionTypeRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FictionTypeRead {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<FictionTypeRow> for FictionTypeRead {
    fn from(row: FictionTypeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

/// Tag row (canonical reference data)
#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagRead {
    pub id: i64,
    pub name: String,
}

impl From<TagRow> for TagRead {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Recommendation row
#[derive(Debug, Clone, FromRow)]
pub struct RecommendationRow {
    pub id: i64,
    pub title: String,
    pub short_description: String,
    pub opinion: String,
    pub published: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub user_id: i64,
    pub fiction_type_id: i64,
}

/// Recommendation with its fiction type and tags embedded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationRead {
    pub id: i64,
    pub title: String,
    pub short_description: String,
    pub opinion: String,
    pub user_id: i64,
    pub published: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub fiction_type: FictionTypeRead,
    pub tags: Vec<TagRead>,
}

impl RecommendationRead {
    /// Assemble the read model from its already-loaded parts.
    pub fn assemble(
        row: RecommendationRow,
        fiction_type: FictionTypeRow,
        tags: Vec<TagRow>,
    ) -> Self {
        Self {
            id: row.id,
            title: row.title,
            short_description: row.short_description,
            opinion: row.opinion,
            user_id: row.user_id,
            published: row.published,
            updated: row.updated,
            fiction_type: fiction_type.into(),
            tags: tags.into_iter().map(TagRead::from).collect(),
        }
    }
}

/// Comment row
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub content: String,
    pub published: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub user_id: i64,
    pub recommendation_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentRead {
    pub id: i64,
    pub content: String,
    pub published: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub user_id: i64,
    pub recommendation_id: i64,
}

impl From<CommentRow> for CommentRead {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            published: row.published,
            updated: row.updated,
            user_id: row.user_id,
            recommendation_id: row.recommendation_id,
        }
    }
}

/// Reaction row
#[derive(Debug, Clone, FromRow)]
pub struct ReactionRow {
    pub id: i64,
    pub is_positive: bool,
    pub user_id: i64,
    pub recommendation_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReactionRead {
    pub id: i64,
    pub is_positive: bool,
    pub user_id: i64,
    pub recommendation_id: i64,
}

impl From<ReactionRow> for ReactionRead {
    fn from(row: ReactionRow) -> Self {
        Self {
            id: row.id,
            is_positive: row.is_positive,
            user_id: row.user_id,
            recommendation_id: row.recommendation_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_read_omits_hash() {
        let row = UserRow {
            id: 1,
            username: "test_user".to_string(),
            email: "test_user@gmail.com".to_string(),
            hashed_password: "$argon2id$...".to_string(),
        };

        let read = UserRead::from(row);
        let json = serde_json::to_string(&read).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("hashed_password"));
    }
}
