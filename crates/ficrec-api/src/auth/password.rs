/// Password hashing and verification using Argon2id
///
/// The hash is a PHC string embedding the algorithm, its parameters, and a
/// per-hash random salt, so hashing the same password twice yields different
/// strings that both verify. Digest comparison inside the argon2 crate is
/// constant-time.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// The returned PHC string is safe to store; it carries its own salt and
/// parameters, so no separate storage is needed.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored hash.
///
/// Returns `false` for a mismatch and for a malformed stored hash; a bad row
/// in the database must read as "wrong password", not as a server error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "34somepassword34";
        let hash = hash_password(password).expect("Failed to hash password");

        assert!(verify_password(password, &hash));
        assert!(!verify_password("wrongpassword", &hash));
    }

    #[test]
    fn test_same_password_produces_different_hashes() {
        // Random salt: same plaintext, different strings, both verify.
        let password = "SamePassword123";

        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1));
        assert!(verify_password(password, &hash2));
    }

    #[test]
    fn test_distinct_passwords_do_not_cross_verify() {
        let hash = hash_password("password-one").unwrap();
        assert!(!verify_password("password-two", &hash));
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        assert!(!verify_password("password", "not-a-phc-string"));
        assert!(!verify_password("password", ""));
    }
}
