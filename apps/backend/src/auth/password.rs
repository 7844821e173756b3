//! Password hashing and verification.
//!
//! Stored credentials are salted bcrypt hashes; raw passwords never
//! leave this module's call sites.

use crate::error::AppError;

/// Hash a raw password for storage.
pub fn hash_password(raw: &str) -> Result<String, AppError> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("failed to hash password: {e}")))
}

/// Compare a raw password against a stored hash. A malformed stored
/// hash counts as a mismatch rather than an error, so credential
/// checks stay uniform.
pub fn verify_password(raw: &str, stored_hash: &str) -> bool {
    bcrypt::verify(raw, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        // MIN_COST keeps the test fast; verification is cost-agnostic.
        let hash = bcrypt::hash("s3cret", 4).unwrap();
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_hash_password_produces_verifiable_hash() {
        let hash = hash_password("admin123").unwrap();
        assert!(verify_password("admin123", &hash));
    }
}
