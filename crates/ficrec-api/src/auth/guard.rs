//! Ownership authorization
//!
//! Every owned resource (recommendation, comment, reaction) carries an
//! immutable `user_id`; only that user may mutate it. The check is uniform
//! across resource kinds and pure. Callers confirm existence first - a 404
//! is reported before ownership is ever considered.

use super::middleware::CurrentUser;
use crate::error::AppError;

/// Whether `user` may mutate a resource owned by `owner_id`.
pub fn can_mutate(user: &CurrentUser, owner_id: i64) -> bool {
    user.id == owner_id
}

/// Fail with 403 unless `user` owns the resource.
///
/// `verb` and `kind` only shape the error detail, e.g.
/// "User has no permission to update comment with id 3".
pub fn ensure_owner(
    user: &CurrentUser,
    owner_id: i64,
    verb: &str,
    kind: &str,
    id: i64,
) -> Result<(), AppError> {
    if can_mutate(user, owner_id) {
        Ok(())
    } else {
        Err(AppError::no_permission(verb, kind, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> CurrentUser {
        CurrentUser {
            id,
            username: "test_user".to_string(),
            email: "test_user@gmail.com".to_string(),
        }
    }

    #[test]
    fn test_owner_may_mutate() {
        assert!(can_mutate(&user(1), 1));
        assert!(ensure_owner(&user(1), 1, "update", "recommendation", 5).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        assert!(!can_mutate(&user(2), 1));

        let err = ensure_owner(&user(2), 1, "delete", "reaction", 9).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(
            err.to_string(),
            "User has no permission to delete reaction with id 9"
        );
    }
}
