//! Authentication service layer
//!
//! Business logic for registration, credential verification with token
//! issuance, and profile updates. Credential hashing is CPU-bound and runs on
//! the blocking pool so it never stalls the request executor.

use super::jwt::issue_token;
use super::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::UserRead;
use crate::repo;
use crate::state::AppState;
use ficrec_core::AuthConfig;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;
use validator::Validate;

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 5, max = 255))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Login form (OAuth2 password-grant shape)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

/// Issued session token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Partial profile update. An absent field is left unchanged; a present
/// field is applied and must pass validation even when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserUpdate {
    #[serde(default)]
    #[validate(length(min = 5, max = 255))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

/// Authentication service
pub struct AuthService {
    db: SqlitePool,
    auth: AuthConfig,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            auth: state.config.auth.clone(),
        }
    }

    /// Register a new user.
    ///
    /// Username and email uniqueness is checked up front for a precise 409
    /// detail; the schema constraints remain the backstop for writers racing
    /// past the check.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserRead, AppError> {
        if repo::users::find_by_username(&self.db, &request.username)
            .await?
            .is_some()
        {
            return Err(AppError::duplicate("username"));
        }
        if repo::users::find_by_email(&self.db, &request.email)
            .await?
            .is_some()
        {
            return Err(AppError::duplicate("email"));
        }

        let password = request.password.clone();
        let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let user = match repo::users::insert(&self.db, &request.username, &request.email, &hashed)
            .await
        {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                // Lost a registration race after the pre-check passed.
                let field = if db.message().contains("username") {
                    "username"
                } else {
                    "email"
                };
                return Err(AppError::duplicate(field));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(user.into())
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown username and wrong password produce the identical 401; the
    /// response never reveals which one failed.
    pub async fn login(&self, form: TokenForm) -> Result<TokenResponse, AppError> {
        let user = repo::users::find_by_username(&self.db, &form.username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let hash = user.hashed_password.clone();
        let password = form.password;
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let access_token =
            issue_token(&self.auth, user.id).map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Apply a partial profile update for `user_id`.
    pub async fn update_profile(
        &self,
        user_id: i64,
        update: UserUpdate,
    ) -> Result<UserRead, AppError> {
        if update.is_empty() {
            return Err(AppError::no_data());
        }

        if let Some(username) = &update.username {
            if let Some(existing) = repo::users::find_by_username(&self.db, username).await? {
                if existing.id != user_id {
                    return Err(AppError::duplicate("username"));
                }
            }
        }
        if let Some(email) = &update.email {
            if let Some(existing) = repo::users::find_by_email(&self.db, email).await? {
                if existing.id != user_id {
                    return Err(AppError::duplicate("email"));
                }
            }
        }

        let user = repo::users::update_profile(
            &self.db,
            user_id,
            update.username.as_deref(),
            update.email.as_deref(),
        )
        .await?;

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_update_empty_detection() {
        assert!(UserUpdate::default().is_empty());
        assert!(!UserUpdate {
            username: Some("new_user".to_string()),
            email: None,
        }
        .is_empty());
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            username: "user1".to_string(),
            email: "user1@gmail.com".to_string(),
            password: "34somepassword34".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_username = RegisterRequest {
            username: "shor".to_string(),
            ..valid.clone()
        };
        assert!(short_username.validate().is_err());

        let bad_email = RegisterRequest {
            email: "invalid".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..valid
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_user_update_validates_present_fields_only() {
        let absent = UserUpdate::default();
        assert!(absent.validate().is_ok());

        // Provided-but-invalid is an error, not "absent".
        let empty_username = UserUpdate {
            username: Some(String::new()),
            email: None,
        };
        assert!(empty_username.validate().is_err());
    }
}
