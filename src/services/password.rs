use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::{AppError, Result};

/// Hash an access password with a fresh random salt.
///
/// Blank passwords are filtered out by the upload path before this is called.
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored hash.
///
/// Returns false on mismatch and on any parse or verify failure, without
/// distinguishing which part failed.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("secret").unwrap();
        assert!(verify_password("secret", &hash));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("secret").unwrap();
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_errors() {
        assert!(!verify_password("secret", "not-a-phc-string"));
        assert!(!verify_password("secret", ""));
    }
}
